//! Client behaviour against a local stand-in for the package index.

use devbox_core::Error;
use devbox_provider_pypi::PyPiClient;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Index {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl Index {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn serve(&self, route: &str, response: ResponseTemplate) {
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(response)
                .mount(&self.server),
        );
    }

    fn client(&self) -> PyPiClient {
        PyPiClient::new(format!("{}/", self.server.uri())).unwrap()
    }
}

#[test]
fn latest_version_compares_releases_numerically() {
    let index = Index::start();
    index.serve(
        "/Mercurial/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "info": {"name": "Mercurial"},
            "releases": {"6.9": [], "6.10": [], "6.10rc0": [], "6.8.2": []}
        })),
    );

    assert_eq!(index.client().latest_version("Mercurial").unwrap(), "6.10");
}

#[test]
fn latest_version_without_usable_releases() {
    let index = Index::start();
    index.serve(
        "/Mercurial/json",
        ResponseTemplate::new(200).set_body_json(json!({"releases": {"nightly": []}})),
    );

    let err = index.client().latest_version("Mercurial").unwrap_err();
    assert!(matches!(err, Error::MissingResource { .. }));
}

#[test]
fn release_download_url_points_into_directory_listing() {
    let index = Index::start();
    index.serve(
        "/Mercurial/6.10/json",
        ResponseTemplate::new(200).set_body_json(json!({
            "info": {"download_url": "https://www.mercurial-scm.org/release/"}
        })),
    );

    assert_eq!(
        index
            .client()
            .release_download_url("Mercurial", "6.10")
            .unwrap(),
        "https://www.mercurial-scm.org/release/mercurial-6.10.tar.gz"
    );
}

#[test]
fn release_without_download_url_is_reported() {
    let index = Index::start();
    index.serve(
        "/Mercurial/6.10/json",
        ResponseTemplate::new(200).set_body_json(json!({"info": {"download_url": null}})),
    );

    let err = index
        .client()
        .release_download_url("Mercurial", "6.10")
        .unwrap_err();
    assert!(matches!(err, Error::MissingResource { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn http_errors_are_network_errors() {
    let index = Index::start();
    index.serve("/Mercurial/json", ResponseTemplate::new(503));

    let err = index.client().latest_version("Mercurial").unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
    assert!(err.to_string().contains("503"));
}

#[test]
fn download_writes_archive_named_after_url() {
    let index = Index::start();
    index.serve(
        "/release/mercurial-6.10.tar.gz",
        ResponseTemplate::new(200).set_body_bytes(b"not really a tarball".to_vec()),
    );
    let dest = TempDir::new().unwrap();

    let url = format!("{}/release/mercurial-6.10.tar.gz", index.server.uri());
    let written = index.client().download(&url, dest.path()).unwrap();

    assert_eq!(written, dest.path().join("mercurial-6.10.tar.gz"));
    assert_eq!(std::fs::read(&written).unwrap(), b"not really a tarball");
}
