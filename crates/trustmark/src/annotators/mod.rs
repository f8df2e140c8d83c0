//! Annotators: each evaluates one criterion against one data item.
//!
//! An annotator decides `is_satisfied` and returns an unsigned annotation
//! stamped with the item's lineage. Signing happens once, in the pipeline.

mod pki;
mod pki_http;
mod source;
mod tls;
mod tpm;

pub use pki::{PkiAnnotator, Signable};
pub use pki_http::PkiHttpAnnotator;
pub use source::SourceAnnotator;
pub use tls::TlsAnnotator;
pub use tpm::TpmAnnotator;

use thiserror::Error;
use tracing::debug;
use trustmark_core::{Annotation, AnnotationType, InvalidTypeError, LayerType, Lineage, SdkInfo};
use trustmark_crypto::CryptoError;
use trustmark_http::HttpSignatureError;

use crate::context::AnnotationContext;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("invalid annotation type: {0}")]
    InvalidAnnotationType(InvalidTypeError),

    /// The kind is recognized but has no built-in annotator.
    #[error("annotation type {0} has no annotator")]
    Unsupported(AnnotationType),

    #[error("{kind} annotator needs {what} in the annotation context")]
    MissingContext {
        kind: AnnotationType,
        what: &'static str,
    },

    #[error("{kind} annotator cannot read its input: {reason}")]
    MalformedInput { kind: AnnotationType, reason: String },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Http(#[from] HttpSignatureError),
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;

pub trait Annotator: Send + Sync {
    fn kind(&self) -> AnnotationType;

    fn annotate(
        &self,
        ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        data: &[u8],
    ) -> Result<Annotation>;
}

/// Build the annotator for `kind` from SDK configuration.
///
/// Key material is read here; I/O failures propagate.
pub fn new_annotator(kind: AnnotationType, cfg: &SdkInfo) -> Result<Box<dyn Annotator>> {
    let annotator: Box<dyn Annotator> = match kind {
        AnnotationType::Pki => Box::new(PkiAnnotator::new(&cfg.signature)?),
        AnnotationType::PkiHttp => Box::new(PkiHttpAnnotator::new(&cfg.signature)?),
        AnnotationType::Source => Box::new(SourceAnnotator),
        AnnotationType::Tls => Box::new(TlsAnnotator),
        AnnotationType::Tpm => Box::new(TpmAnnotator),
        reserved @ (AnnotationType::SourceCode
        | AnnotationType::Checksum
        | AnnotationType::Vulnerability
        | AnnotationType::Sbom) => return Err(AnnotatorError::Unsupported(reserved)),
    };
    debug!(annotator = %kind, "annotator ready");
    Ok(annotator)
}

/// Build the annotator named `kind`, rejecting unknown names.
pub fn annotator_for(kind: &str, cfg: &SdkInfo) -> Result<Box<dyn Annotator>> {
    let kind: AnnotationType = kind
        .parse()
        .map_err(AnnotatorError::InvalidAnnotationType)?;
    new_annotator(kind, cfg)
}
