//! Error types for the crypto module.

use std::path::PathBuf;

use thiserror::Error;
use trustmark_core::{InvalidTypeError, KeyAlgorithm};

/// Errors that can occur while loading keys, hashing, signing or verifying.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The requested algorithm is not a member of its enumeration.
    #[error(transparent)]
    InvalidType(#[from] InvalidTypeError),

    /// Key material could not be read from disk.
    #[error("failed to read key material from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key material was read but does not decode as the configured algorithm.
    #[error("malformed {algorithm} key: {reason}")]
    MalformedKey {
        algorithm: KeyAlgorithm,
        reason: String,
    },

    /// Signature bytes do not decode for the algorithm.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// A public key of one algorithm was handed to a provider of another.
    #[error("public key algorithm {actual} does not match provider algorithm {expected}")]
    KeyMismatch {
        expected: KeyAlgorithm,
        actual: KeyAlgorithm,
    },

    #[error("signing failed: {0}")]
    Signing(String),
}

impl CryptoError {
    pub(crate) fn malformed_key(algorithm: KeyAlgorithm, reason: impl ToString) -> Self {
        CryptoError::MalformedKey {
            algorithm,
            reason: reason.to_string(),
        }
    }
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
