//! Error types shared by the origin, negotiation, and server layers.

use thiserror::Error;

/// Errors raised while fetching from origin or assembling a response.
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Origin unreachable: {0}")]
    OriginUnreachable(String),

    /// Origin answered, but not with a 2xx.
    #[error("Upstream {0}")]
    UpstreamStatus(u16),

    #[error("Decode failure: {0}")]
    Decode(String),

    /// A value could not be rendered for output.
    #[error("Render failure: {0}")]
    Render(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for EdgeError {
    fn from(err: config::ConfigError) -> Self {
        EdgeError::ConfigError(err.to_string())
    }
}
