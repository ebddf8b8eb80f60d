//! Common error types for the study notes backend

use thiserror::Error;

/// Common result type for study notes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the study notes crates
#[derive(Error, Debug)]
pub enum Error {
    /// Required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    /// Credential payload could not be decoded
    #[error("Invalid credentials in {var}: {source}")]
    InvalidCredentials {
        var: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
