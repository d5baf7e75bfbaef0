//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a configuration file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file or value is not valid JSON for the requested type
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The requested key is not present in any source
    #[error("Missing configuration key: {0}")]
    MissingKey(String),

    /// A group file does not contain a JSON object at its root
    #[error("Configuration group {0} is not an object")]
    NotAnObject(String),
}
