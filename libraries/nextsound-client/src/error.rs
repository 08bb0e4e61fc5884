//! Error types for the NextSound HTTP clients.

use nextsound_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to a catalog or the favorites service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no session available
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse service response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Requested entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint hit (e.g. favorite already stored)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by service
    #[error("Rate limited")]
    RateLimited,
}

impl ClientError {
    /// Whether another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::ServerError { status, .. } => *status >= 500,
            Self::RateLimited => true,
            _ => false,
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) => CoreError::Network(e.to_string()),
            ClientError::ServerError { status, message } => CoreError::Provider { status, message },
            ClientError::AuthRequired => CoreError::AuthRequired,
            ClientError::InvalidUrl(msg) => CoreError::InvalidInput(msg),
            ClientError::ParseError(msg) => CoreError::Provider {
                status: 200,
                message: msg,
            },
            ClientError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            ClientError::Conflict(msg) => CoreError::Conflict(msg),
            ClientError::RateLimited => CoreError::Provider {
                status: 429,
                message: "rate limited".to_string(),
            },
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
