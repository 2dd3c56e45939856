//! Error types for playback coordination

use thiserror::Error;

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Playback errors
///
/// Engine failures never cross the coordinator boundary into the UI; they
/// are logged and swallowed there. This type exists for the engine
/// contract and the coordinator's internals.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Engine call failed (I/O, codec, network resource)
    #[error("Engine error: {0}")]
    Engine(String),

    /// The engine has not been set up yet
    #[error("Engine not ready")]
    NotReady,

    /// Queue index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

impl PlaybackError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}
