/// Error types for the command-line host
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Client(#[from] nextsound_client::ClientError),

    #[error(transparent)]
    Storage(#[from] nextsound_core::CoreError),
}
