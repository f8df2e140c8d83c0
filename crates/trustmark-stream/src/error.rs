//! Error types for the stream module.

use std::path::PathBuf;

use thiserror::Error;
use trustmark_core::{ConfigError, InvalidTypeError, StreamType};
use trustmark_crypto::CryptoError;

/// Errors that can occur while building, connecting to, or publishing on a
/// stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream type is not a member of the enumeration.
    #[error(transparent)]
    InvalidType(#[from] InvalidTypeError),

    /// The stream type is recognized but no provider is registered for it.
    #[error("stream type {0} is not implemented")]
    Unimplemented(StreamType),

    /// The stream payload is inconsistent or incomplete.
    #[error("stream configuration error: {0}")]
    Configuration(String),

    /// Material referenced by the configuration could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger operator key could not be loaded.
    #[error("operator key error: {0}")]
    Key(#[from] CryptoError),

    /// `send` was called on a stream that is not connected.
    #[error("stream is not connected")]
    NotConnected,

    /// The remote sink could not be reached or dropped the session.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote sink was reached and refused the submission.
    #[error("submission rejected: {status}")]
    Rejected { status: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ConfigError> for StreamError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidType(e) => StreamError::InvalidType(e),
            other => StreamError::Configuration(other.to_string()),
        }
    }
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
