use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the navigation crate.
pub type Result<T> = std::result::Result<T, NavError>;

/// Errors surfaced by the location service and its configuration layer.
#[derive(Debug, Error)]
pub enum NavError {
    /// Raised by the legacy compat surface for calls that were never ported.
    #[error("legacy location compat layer: `{method}` implementation missing")]
    NotImplemented { method: &'static str },
    #[error("invalid navigation config: {0}")]
    Config(String),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NavError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, NavError::NotImplemented { .. })
    }
}
