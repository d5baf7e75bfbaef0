//! Error types for mail operations

use postman_config::ConfigError;
use thiserror::Error;

/// Result type for mail operations
pub type PostmanResult<T> = Result<T, PostmanError>;

/// Errors that can occur while configuring or sending mail
#[derive(Debug, Error)]
pub enum PostmanError {
    /// The configured driver is not one of `mail`, `sendmail`, `smtp`
    #[error("Unrecognized mail driver: {0}")]
    UnrecognizedDriver(String),

    /// A field required by the selected driver is absent
    #[error("Mail driver '{driver}' requires '{field}' to be configured")]
    MissingField {
        driver: &'static str,
        field: &'static str,
    },

    /// SMTP port is neither a number nor a numeric string
    #[error("Invalid SMTP port: {0}")]
    InvalidPort(String),

    /// SMTP encryption is not `ssl`, `tls` or empty
    #[error("Unsupported SMTP encryption: {0}")]
    UnsupportedEncryption(String),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid body content type
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Message building error
    #[error("Failed to build message: {0}")]
    MessageBuildError(String),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// SMTP transport failure
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Sendmail transport failure
    #[error(transparent)]
    Sendmail(#[from] lettre::transport::sendmail::Error),

    /// Stub transport failure
    #[error(transparent)]
    Stub(#[from] lettre::transport::stub::Error),
}
