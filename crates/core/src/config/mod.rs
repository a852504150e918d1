//! Configuration for devbox
//!
//! Loaded from an optional `devbox.toml` in the box root (or a file given on
//! the command line). Every field is optional; unset fields fall back to the
//! built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::command::parallelism;
use crate::{Error, Result};

/// Default configuration file name, looked up in the box root.
pub const CONFIG_FILE: &str = "devbox.toml";

/// Default manifest title.
pub const DEFAULT_TITLE: &str = "Python-Dev In a Box";

/// Main configuration structure for devbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct BoxConfig {
    /// Title written at the top of the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Worker-count hint for `make -j` and the test runner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// Command (program plus leading arguments) used to open web pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Vec<String>>,

    /// External program overrides
    pub executables: Executables,

    /// Repository or download-page URL overrides, keyed by provider id
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub urls: BTreeMap<String, String>,
}

/// External program overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Executables {
    /// Mercurial client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hg: Option<String>,

    /// Subversion client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svn: Option<String>,

    /// Make program used for documentation and interpreter builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
}

impl BoxConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, Some(path.to_path_buf()), "reading configuration"))?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            Error::Configuration { message } => {
                Error::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`BoxConfig::load`] for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Manifest title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Worker-count hint, defaulting to the available parallelism.
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs.filter(|&j| j > 0).unwrap_or_else(parallelism)
    }

    /// Mercurial program.
    #[must_use]
    pub fn hg(&self) -> &str {
        self.executables.hg.as_deref().unwrap_or("hg")
    }

    /// Subversion program.
    #[must_use]
    pub fn svn(&self) -> &str {
        self.executables.svn.as_deref().unwrap_or("svn")
    }

    /// Make program; `make.bat` on Windows unless overridden.
    #[must_use]
    pub fn make(&self) -> &str {
        self.executables
            .make
            .as_deref()
            .unwrap_or(if cfg!(windows) { "make.bat" } else { "make" })
    }

    /// URL for provider `id`, or `default` when not overridden.
    #[must_use]
    pub fn url_for(&self, id: &str, default: &str) -> String {
        self.urls
            .get(id)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}
