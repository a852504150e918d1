//! Package index client for devbox.
//!
//! Resolves the newest release of a project on the Python Package Index and
//! downloads its source archive. Only the index's JSON API is used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use devbox_core::{Error, Result};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Default package index.
pub const DEFAULT_INDEX: &str = "https://pypi.org/pypi";

const ARCHIVE_SUFFIXES: [&str; 4] = [".tar.gz", ".tar.bz2", ".tgz", ".zip"];

#[derive(Debug, Deserialize)]
struct ProjectDocument {
    releases: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDocument {
    info: ReleaseInfo,
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    #[serde(default)]
    download_url: Option<String>,
}

/// Blocking client for the index's JSON API.
#[derive(Debug, Clone)]
pub struct PyPiClient {
    client: reqwest::blocking::Client,
    index: String,
}

impl PyPiClient {
    /// Create a client for the index at `index` (e.g. [`DEFAULT_INDEX`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be initialised.
    pub fn new(index: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("devbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            index: index.into().trim_end_matches('/').to_string(),
        })
    }

    /// Index base URL.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "Querying package index");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::network(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "request to {url} failed: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| Error::network(format!("invalid response from {url}: {e}")))
    }

    /// Newest release of `project`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failures and
    /// [`Error::MissingResource`] if no release has a usable version.
    #[instrument(skip(self))]
    pub fn latest_version(&self, project: &str) -> Result<String> {
        let url = format!("{}/{project}/json", self.index);
        let document: ProjectDocument = self.get_json(&url)?;
        pick_latest(document.releases.keys().map(String::as_str)).ok_or_else(|| {
            Error::missing_resource(
                format!("{project} releases"),
                "the package index lists no recognisable versions",
            )
        })
    }

    /// URL of the source archive for `project` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingResource`] if the release metadata carries no
    /// download URL.
    #[instrument(skip(self))]
    pub fn release_download_url(&self, project: &str, version: &str) -> Result<String> {
        let url = format!("{}/{project}/{version}/json", self.index);
        let document: ReleaseDocument = self.get_json(&url)?;
        release_archive_url(document.info.download_url.as_deref(), project, version)
    }

    /// Download `url` into `dest_dir`, naming the file after the URL's last
    /// path segment. Returns the written file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failures or an I/O error if
    /// the file cannot be written.
    #[instrument(skip(self))]
    pub fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let file_name = file_name_from_url(url).ok_or_else(|| {
            Error::missing_resource(url, "download URL does not name a file")
        })?;
        let dest = dest_dir.join(file_name);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::network(format!("failed to download {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::network(format!(
                "failed to download {url}: HTTP {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| Error::network(format!("failed to read {url}: {e}")))?;

        std::fs::write(&dest, &bytes)
            .map_err(|e| Error::io(e, Some(dest.clone()), "writing download"))?;

        #[allow(clippy::cast_precision_loss)] // Precision loss acceptable for display
        let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
        info!(path = %dest.display(), size_mb = %format_args!("{size_mb:.2}"), "Downloaded");
        Ok(dest)
    }
}

/// Highest version among `versions`, compared as semantic versions.
///
/// Short versions are padded (`6.7` compares as `6.7.0`); versions that still
/// do not parse are ignored. The original spelling is returned.
#[must_use]
pub fn pick_latest<'a>(versions: impl IntoIterator<Item = &'a str>) -> Option<String> {
    versions
        .into_iter()
        .filter_map(|v| normalize(v).map(|parsed| (parsed, v)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v.to_string())
}

fn normalize(version: &str) -> Option<semver::Version> {
    let version = version.trim();
    let parts = version.split('.').count();
    let padded = match parts {
        1 => format!("{version}.0.0"),
        2 => format!("{version}.0"),
        _ => version.to_string(),
    };
    semver::Version::parse(&padded).ok()
}

/// Last path segment of `url`, ignoring any query or fragment.
#[must_use]
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    (!name.is_empty() && !name.contains(':')).then_some(name)
}

/// Archive URL of `project` at `version`, given the release's `download_url`
/// metadata.
///
/// # Errors
///
/// Returns [`Error::MissingResource`] when the release carries no download
/// URL, which means the project publishes its releases differently now.
pub fn release_archive_url(
    download_url: Option<&str>,
    project: &str,
    version: &str,
) -> Result<String> {
    let download_url = download_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            Error::missing_resource(
                format!("{project} {version}"),
                format!("{project} has changed how it releases software on the package index"),
            )
        })?;
    Ok(archive_url(download_url, project, version))
}

/// Turn a release's `download_url` into an archive URL.
///
/// Some projects publish a directory listing as their download URL; the
/// archive is then `<project>-<version>.tar.gz` inside it.
#[must_use]
pub fn archive_url(download_url: &str, project: &str, version: &str) -> String {
    let download_url = download_url.trim();
    if ARCHIVE_SUFFIXES
        .iter()
        .any(|suffix| download_url.ends_with(suffix))
    {
        return download_url.to_string();
    }
    format!(
        "{}/{}-{version}.tar.gz",
        download_url.trim_end_matches('/'),
        project.to_lowercase()
    )
}
