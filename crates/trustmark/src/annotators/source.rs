use trustmark_core::{Annotation, AnnotationType, LayerType, Lineage};

use super::{Annotator, Result};
use crate::context::AnnotationContext;

/// Records provenance: which host saw which content. Always satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceAnnotator;

impl Annotator for SourceAnnotator {
    fn kind(&self) -> AnnotationType {
        AnnotationType::Source
    }

    fn annotate(
        &self,
        _ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        _data: &[u8],
    ) -> Result<Annotation> {
        Ok(Annotation::new(lineage, layer, AnnotationType::Source, true))
    }
}
