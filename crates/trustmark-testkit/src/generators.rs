//! Proptest generators for property-based testing.

use proptest::prelude::*;

use trustmark_core::{AnnotationType, HashType, KeyAlgorithm, LayerType, Lineage};

pub fn hash_type() -> impl Strategy<Value = HashType> {
    prop::sample::select(HashType::ALL.to_vec())
}

pub fn annotation_type() -> impl Strategy<Value = AnnotationType> {
    prop::sample::select(AnnotationType::ALL.to_vec())
}

/// Kinds with a built-in annotator.
pub fn implemented_annotation_type() -> impl Strategy<Value = AnnotationType> {
    prop::sample::select(crate::fixtures::implemented_annotators())
}

pub fn layer() -> impl Strategy<Value = LayerType> {
    prop::sample::select(LayerType::ALL.to_vec())
}

pub fn key_algorithm() -> impl Strategy<Value = KeyAlgorithm> {
    prop::sample::select(KeyAlgorithm::ALL.to_vec())
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Strings that are not the wire name of any member of any enumeration.
pub fn invalid_type_name() -> impl Strategy<Value = String> {
    "[a-z@-]{0,16}".prop_filter("must not name a member", |s| {
        !HashType::validate(s)
            && !KeyAlgorithm::validate(s)
            && !AnnotationType::validate(s)
            && !LayerType::validate(s)
    })
}

pub fn lineage() -> impl Strategy<Value = Lineage> {
    (
        "[0-9a-f]{64}",
        hash_type(),
        "[a-z][a-z0-9-]{0,15}",
        "[0-9a-f]{0,40}",
    )
        .prop_map(|(key, hash, host, tag)| Lineage::new(key, hash, host, tag))
}
