//! Error types for agora.

use thiserror::Error;

use crate::event::NaturalKey;

/// Errors that can occur in agora operations.
#[derive(Error, Debug)]
pub enum AgoraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Offline: the remote store was not contacted")]
    Offline,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Event not found: {0}")]
    EventNotFound(NaturalKey),

    #[error("Not signed in. Run `agora login` first")]
    NotSignedIn,
}

/// Result type alias for agora operations.
pub type AgoraResult<T> = Result<T, AgoraError>;
