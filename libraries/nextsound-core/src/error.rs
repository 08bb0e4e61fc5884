/// Core error types for NextSound
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by every collaborator boundary
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// A remote provider answered with a failure status
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness conflict on the remote side (e.g. favorite already stored)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation requires a signed-in user
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether a retry at the network layer could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Provider { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
