/// Core error types for Lyra
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Lyra
#[derive(Error, Debug)]
pub enum CoreError {
    /// A document is missing a required field or has the wrong shape
    #[error("Invalid {entity} document {id}: {reason}")]
    InvalidDocument {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create an invalid-document error
    pub fn invalid(entity: &'static str, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            entity,
            id: id.into(),
            reason: reason.into(),
        }
    }
}
