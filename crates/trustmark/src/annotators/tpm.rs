use trustmark_core::{Annotation, AnnotationType, LayerType, Lineage};

use super::{Annotator, AnnotatorError, Result};
use crate::context::AnnotationContext;

/// Satisfied iff the host has a TPM and its quote verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct TpmAnnotator;

impl Annotator for TpmAnnotator {
    fn kind(&self) -> AnnotationType {
        AnnotationType::Tpm
    }

    fn annotate(
        &self,
        ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        _data: &[u8],
    ) -> Result<Annotation> {
        let facts = ctx.tpm.ok_or(AnnotatorError::MissingContext {
            kind: AnnotationType::Tpm,
            what: "tpm facts",
        })?;
        let satisfied = facts.device_present && facts.quote_verified;
        Ok(Annotation::new(lineage, layer, AnnotationType::Tpm, satisfied))
    }
}
