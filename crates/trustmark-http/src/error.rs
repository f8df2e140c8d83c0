//! Error types for HTTP signature verification.

use thiserror::Error;
use trustmark_core::{InvalidTypeError, KeyAlgorithm};
use trustmark_crypto::CryptoError;

/// Errors raised while verifying or attaching an HTTP message signature.
#[derive(Debug, Error)]
pub enum HttpSignatureError {
    /// The configured key type is not a member of the key algorithms.
    #[error("invalid key type: {0}")]
    InvalidKeyType(InvalidTypeError),

    /// A covered `@`-component is not a known derived component.
    #[error("invalid derived component: {0}")]
    InvalidDerivedComponent(InvalidTypeError),

    /// The request lacks the `Signature-Input` or `Signature` header.
    #[error("request carries no {0} header")]
    MissingHeader(&'static str),

    #[error("malformed signature input: {0}")]
    MalformedSignatureInput(String),

    /// A covered component has no value in the request.
    #[error("covered component {0} is absent from the request")]
    MissingComponent(String),

    /// A header value is not visible ASCII.
    #[error("header {0} is not valid text")]
    InvalidHeader(String),

    /// The request declares an algorithm other than the configured one.
    #[error("request declares algorithm {declared:?}, handler is configured for {configured}")]
    AlgorithmMismatch {
        configured: KeyAlgorithm,
        declared: String,
    },

    /// Verification ran and the signature does not match.
    #[error("signature verification failed")]
    InvalidSignature,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl HttpSignatureError {
    /// Whether this error is a verdict about the request rather than a fault
    /// in the handler's own configuration.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            HttpSignatureError::InvalidKeyType(_) | HttpSignatureError::Crypto(_)
        )
    }
}

/// Result type for HTTP signature operations.
pub type Result<T> = std::result::Result<T, HttpSignatureError>;
