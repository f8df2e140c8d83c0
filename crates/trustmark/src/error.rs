//! Error types for the SDK.

use thiserror::Error;
use trustmark_core::{ConfigError, CoreError};
use trustmark_crypto::CryptoError;
use trustmark_http::HttpSignatureError;
use trustmark_stream::StreamError;

use crate::annotators::AnnotatorError;

/// Errors that can occur during SDK construction or an annotation pass.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Annotation serialization error.
    #[error("annotation error: {0}")]
    Core(#[from] CoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("http signature error: {0}")]
    Http(#[from] HttpSignatureError),

    #[error("annotator error: {0}")]
    Annotator(#[from] AnnotatorError),

    /// The local host name could not be determined.
    #[error("failed to resolve host name: {0}")]
    Host(#[source] std::io::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
