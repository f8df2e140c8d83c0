//! Error types for trustmark core.

use thiserror::Error;

use crate::types::StreamType;

/// A string that does not name a member of one of the closed enumerations.
///
/// This is the "malformed value" failure. A value that is recognized but not
/// built (such as the `pravega` stream type) parses successfully and is
/// rejected later by the factory that would instantiate it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {enumeration} value provided: {value:?}")]
pub struct InvalidTypeError {
    /// Which enumeration rejected the value (e.g. `"hash type"`).
    pub enumeration: &'static str,
    /// The offending input.
    pub value: String,
}

impl InvalidTypeError {
    pub fn new(enumeration: &'static str, value: impl Into<String>) -> Self {
        Self {
            enumeration,
            value: value.into(),
        }
    }
}

/// Errors raised while interpreting already-parsed provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidType(#[from] InvalidTypeError),

    /// The configuration payload does not have the shape its type tag declares.
    #[error("configuration payload does not match stream type {kind}: {reason}")]
    Mismatch { kind: StreamType, reason: String },

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Core errors that can occur while encoding or decoding annotations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
