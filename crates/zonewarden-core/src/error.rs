//! Error types for zonewarden
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for zonewarden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonewarden
#[derive(Error, Debug)]
pub enum Error {
    /// Custom-domain provisioning errors (carries the API response body)
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Log sink errors
    #[error("Log sink error: {0}")]
    LogSink(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failures: the request never produced an API response
    /// (connect error, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found on the provider side
    #[error("Not found: {0}")]
    NotFound(String),

    /// A conflicting record already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a provisioning error
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::Provisioning(msg.into())
    }

    /// Create a log sink error
    pub fn log_sink(msg: impl Into<String>) -> Self {
        Self::LogSink(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an "already exists" error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error is an error response from a remote API
    ///
    /// Transport failures (`Http`) are not.
    pub fn is_provider_side(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. }
                | Self::Authentication(_)
                | Self::NotFound(_)
                | Self::Json(_)
        )
    }
}
