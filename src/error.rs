//! Error types for the reporting pipeline

use std::path::Path;
use thiserror::Error;

/// Result type alias for reporting operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for reporting operations
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("Failed to fetch {package}: {source}")]
    Fetch {
        package: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug)]
struct StringError(String);

impl std::fmt::Display for StringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StringError {}

impl ReportError {
    /// Create a manifest error for the given path
    pub fn manifest(path: &Path, msg: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.display().to_string(),
            message: msg.into(),
        }
    }

    /// Create a fetch error wrapping an underlying cause
    pub fn fetch(
        package: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Fetch {
            package: package.into(),
            source: source.into(),
        }
    }

    /// Create a fetch error from a plain message
    pub fn fetch_msg(package: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::fetch(package, StringError(msg.into()))
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(StringError(msg.into())))
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
