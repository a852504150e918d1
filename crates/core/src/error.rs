//! Error types for devbox operations

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for devbox operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// An external command ran but exited unsuccessfully
    #[error("`{program}` exited with {}", display_code(.code))]
    #[diagnostic(code(devbox::command::failed))]
    CommandFailed {
        /// Program that was invoked
        program: String,
        /// Arguments passed to the program
        args: Vec<String>,
        /// Exit code, `None` when the process was terminated by a signal
        code: Option<i32>,
    },

    /// An external command could not be started at all
    #[error("failed to start `{program}`")]
    #[diagnostic(
        code(devbox::command::spawn),
        help("Make sure `{program}` is installed and on your PATH")
    )]
    CommandSpawn {
        /// Program that could not be started
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(devbox::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// `update` was requested for something that was never created
    #[error("{provider} has not been created yet (expected {})", .path.display())]
    #[diagnostic(
        code(devbox::provider::not_created),
        help("Run `devbox create` first")
    )]
    NotCreated {
        /// Provider name
        provider: String,
        /// Directory that is missing
        path: PathBuf,
    },

    /// A build step needs another provider's content which is not there
    #[error("building {provider} requires {requires} (missing {})", .path.display())]
    #[diagnostic(
        code(devbox::provider::missing_dependency),
        help("Create {requires} before building {provider}")
    )]
    MissingDependency {
        /// Provider whose build failed
        provider: String,
        /// Provider that has to be created first
        requires: String,
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// Upstream metadata lacks something we rely on
    #[error("{resource}: {detail}")]
    #[diagnostic(
        code(devbox::resource::missing),
        help("Upstream has changed how it publishes releases; please report this to bugs.python.org")
    )]
    MissingResource {
        /// What was being looked up
        resource: String,
        /// What was wrong with it
        detail: String,
    },

    /// No built interpreter could be found
    #[error("CPython is not built (searched {})", .searched.display())]
    #[diagnostic(
        code(devbox::interpreter::not_built),
        help("Run `devbox build-python` to build it")
    )]
    InterpreterNotBuilt {
        /// Source tree that was searched
        searched: PathBuf,
    },

    /// HTTP request failure
    #[error("network error: {message}")]
    #[diagnostic(code(devbox::network))]
    Network {
        /// The error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(devbox::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// A provider id that is not in the catalog
    #[error("unknown provider `{id}`")]
    #[diagnostic(
        code(devbox::catalog::unknown),
        help("Run `devbox list` to see the available providers")
    )]
    UnknownProvider {
        /// The id that was requested
        id: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit status (terminated by signal)".to_string(),
        |c| format!("exit status {c}"),
    )
}

impl Error {
    /// Create a command failure error
    pub fn command_failed(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        code: Option<i32>,
    ) -> Self {
        Self::CommandFailed {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            code,
        }
    }

    /// Create a spawn failure error
    pub fn command_spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawn {
            program: program.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(PathBuf::into_boxed_path),
            operation: operation.into(),
        }
    }

    /// Create a not-created error
    pub fn not_created(provider: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotCreated {
            provider: provider.into(),
            path: path.into(),
        }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(
        provider: impl Into<String>,
        requires: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::MissingDependency {
            provider: provider.into(),
            requires: requires.into(),
            path: path.into(),
        }
    }

    /// Create a missing resource error
    pub fn missing_resource(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingResource {
            resource: resource.into(),
            detail: detail.into(),
        }
    }

    /// Create an interpreter-not-built error
    pub fn interpreter_not_built(searched: impl Into<PathBuf>) -> Self {
        Self::InterpreterNotBuilt {
            searched: searched.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown provider error
    pub fn unknown_provider(id: impl Into<String>) -> Self {
        Self::UnknownProvider { id: id.into() }
    }

    /// Process exit code to report for this error.
    ///
    /// External command failures propagate the child's own exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Result type for devbox operations
pub type Result<T> = std::result::Result<T, Error>;
