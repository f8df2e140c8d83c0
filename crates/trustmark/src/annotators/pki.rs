use serde::{Deserialize, Serialize};
use trustmark_core::{Annotation, AnnotationType, LayerType, Lineage, SignatureInfo};
use trustmark_crypto::{decode_signature, PublicKey};

use super::{Annotator, AnnotatorError, Result};
use crate::context::AnnotationContext;

/// A payload that carries its own signature: `signature` over `seed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signable {
    pub seed: String,
    /// Hex, as produced by a signature provider.
    pub signature: String,
}

impl Signable {
    pub fn new(seed: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            signature: signature.into(),
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Satisfied iff the signable's signature verifies under the configured
/// public key.
pub struct PkiAnnotator {
    public_key: PublicKey,
}

impl PkiAnnotator {
    pub fn new(info: &SignatureInfo) -> Result<Self> {
        Ok(Self::with_public_key(PublicKey::load(&info.public_key)?))
    }

    pub fn with_public_key(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Undecodable signature bytes are an error, not an unsatisfied check.
    fn verify(&self, signable: &Signable) -> Result<bool> {
        let signature = decode_signature(&signable.signature)?;
        Ok(self.public_key.verify(signable.seed.as_bytes(), &signature)?)
    }
}

impl Annotator for PkiAnnotator {
    fn kind(&self) -> AnnotationType {
        AnnotationType::Pki
    }

    fn annotate(
        &self,
        _ctx: &AnnotationContext,
        lineage: &Lineage,
        layer: LayerType,
        data: &[u8],
    ) -> Result<Annotation> {
        let signable: Signable =
            serde_json::from_slice(data).map_err(|e| AnnotatorError::MalformedInput {
                kind: AnnotationType::Pki,
                reason: e.to_string(),
            })?;
        let satisfied = self.verify(&signable)?;
        Ok(Annotation::new(lineage, layer, AnnotationType::Pki, satisfied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustmark_core::{HashType, KeyAlgorithm};
    use trustmark_crypto::CryptoError;
    use trustmark_testkit::fixtures::signer;

    fn lineage() -> Lineage {
        Lineage::new("k", HashType::Sha256, "host", "")
    }

    #[test]
    fn test_valid_signable_is_satisfied() {
        for alg in KeyAlgorithm::ALL {
            let s = signer(*alg);
            let annotator = PkiAnnotator::with_public_key(s.public_key());
            let data = Signable::new("seed", s.sign(b"seed").unwrap()).to_bytes().unwrap();
            let a = annotator
                .annotate(&AnnotationContext::new(), &lineage(), LayerType::Application, &data)
                .unwrap();
            assert!(a.is_satisfied, "{alg}");
            assert_eq!(a.kind, AnnotationType::Pki);
        }
    }

    #[test]
    fn test_mismatched_signature_is_unsatisfied() {
        let s = signer(KeyAlgorithm::Ed25519);
        let annotator = PkiAnnotator::with_public_key(s.public_key());
        let data = Signable::new("seed", s.sign(b"other").unwrap()).to_bytes().unwrap();
        let a = annotator
            .annotate(&AnnotationContext::new(), &lineage(), LayerType::Application, &data)
            .unwrap();
        assert!(!a.is_satisfied);
    }

    #[test]
    fn test_malformed_signature_is_error() {
        let s = signer(KeyAlgorithm::Ed25519);
        let annotator = PkiAnnotator::with_public_key(s.public_key());
        for sig in ["zz-not-hex", "abcd"] {
            let data = Signable::new("seed", sig).to_bytes().unwrap();
            let err = annotator
                .annotate(&AnnotationContext::new(), &lineage(), LayerType::Application, &data)
                .unwrap_err();
            assert!(
                matches!(err, AnnotatorError::Crypto(CryptoError::MalformedSignature(_))),
                "{sig}: {err:?}"
            );
        }
    }

    #[test]
    fn test_non_signable_input_is_error() {
        let annotator = PkiAnnotator::with_public_key(signer(KeyAlgorithm::Ed25519).public_key());
        let err = annotator
            .annotate(&AnnotationContext::new(), &lineage(), LayerType::Application, b"raw")
            .unwrap_err();
        assert!(matches!(err, AnnotatorError::MalformedInput { .. }));
    }
}
