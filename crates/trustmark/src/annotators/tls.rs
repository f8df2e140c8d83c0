use trustmark_core::{Annotation, AnnotationType, LayerType, Lineage};

use super::{Annotator, AnnotatorError, Result};
use crate::context::AnnotationContext;

/// Satisfied iff the data arrived over a completed, peer-verified TLS
/// handshake.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsAnnotator;

impl Annotator for TlsAnnotator {
    fn kind(&self) -> AnnotationType {
        AnnotationType::Tls
    }

    fn annotate(
        &self,
        ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        _data: &[u8],
    ) -> Result<Annotation> {
        let facts = ctx.tls.ok_or(AnnotatorError::MissingContext {
            kind: AnnotationType::Tls,
            what: "tls facts",
        })?;
        let satisfied = facts.handshake_complete && facts.peer_verified;
        Ok(Annotation::new(lineage, layer, AnnotationType::Tls, satisfied))
    }
}
