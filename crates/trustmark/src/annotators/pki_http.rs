use trustmark_core::{Annotation, AnnotationType, LayerType, Lineage, SignatureInfo};
use trustmark_http::RequestHandler;
use tracing::warn;

use super::{Annotator, AnnotatorError, Result};
use crate::context::AnnotationContext;

/// Satisfied iff the inbound request carries a valid message signature.
///
/// A request the handler rejects yields an unsatisfied annotation; a fault
/// in the handler's own key configuration is an error.
pub struct PkiHttpAnnotator {
    handler: RequestHandler,
}

impl PkiHttpAnnotator {
    pub fn new(info: &SignatureInfo) -> Result<Self> {
        Ok(Self::with_handler(RequestHandler::new(info)?))
    }

    pub fn with_handler(handler: RequestHandler) -> Self {
        Self { handler }
    }
}

impl Annotator for PkiHttpAnnotator {
    fn kind(&self) -> AnnotationType {
        AnnotationType::PkiHttp
    }

    fn annotate(
        &self,
        ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        _data: &[u8],
    ) -> Result<Annotation> {
        let request = ctx.request.as_ref().ok_or(AnnotatorError::MissingContext {
            kind: AnnotationType::PkiHttp,
            what: "the inbound request",
        })?;
        let satisfied = match self.handler.validate(request) {
            Ok(()) => true,
            Err(e) if e.is_rejection() => {
                warn!(key = %lineage.key, reason = %e, "request signature not accepted");
                false
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Annotation::new(lineage, layer, AnnotationType::PkiHttp, satisfied))
    }
}
