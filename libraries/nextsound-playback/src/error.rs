//! Error types for playback management

use nextsound_core::CoreError;
use thiserror::Error;

/// Playback errors
///
/// Engine transitions never return these; they surface only from the audio
/// output seam and from the async favorites operations.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Audio output handle refused an operation
    #[error("Audio output error: {0}")]
    Output(String),

    /// Favorites require a signed-in user
    #[error("Authentication required")]
    AuthRequired,

    /// Collaborator failure (favorites store, auth, catalog)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PlaybackError {
    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
