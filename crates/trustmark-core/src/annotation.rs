//! Annotation: one signed assertion about one data item at one layer.
//!
//! An annotation is created once and never re-identified. Annotations about
//! the same data share a [`Lineage`] (key, hash, host, tag, timestamp) and
//! differ only in their kind and outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::CoreError;
use crate::types::{AnnotationType, HashType, LayerType};

/// The per-item stamp shared by every annotation produced for one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    /// Content hash of the annotated data.
    pub key: String,
    /// Algorithm that produced `key`.
    pub hash: HashType,
    /// Hostname of the annotating node.
    pub host: String,
    /// Link to the annotation(s) of the layer beneath.
    pub tag: String,
    /// Creation time of every annotation in the item.
    pub timestamp: DateTime<Utc>,
}

impl Lineage {
    /// Stamp a new lineage at the current time.
    pub fn new(
        key: impl Into<String>,
        hash: HashType,
        host: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            hash,
            host: host.into(),
            tag: tag.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A single criterion evaluated against a piece of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    id: Ulid,
    /// Hash value of the data being annotated.
    pub key: String,
    pub hash: HashType,
    pub host: String,
    #[serde(default)]
    pub tag: String,
    pub layer: LayerType,
    pub kind: AnnotationType,
    #[serde(default)]
    signature: String,
    pub is_satisfied: bool,
    timestamp: DateTime<Utc>,
}

impl Annotation {
    /// Create an unsigned annotation stamped with `lineage`.
    pub fn new(lineage: &Lineage, layer: LayerType, kind: AnnotationType, satisfied: bool) -> Self {
        Self {
            id: Ulid::new(),
            key: lineage.key.clone(),
            hash: lineage.hash,
            host: lineage.host.clone(),
            tag: lineage.tag.clone(),
            layer,
            kind,
            signature: String::new(),
            is_satisfied: satisfied,
            timestamp: lineage.timestamp,
        }
    }

    /// The unique, time-sortable identifier assigned at creation.
    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The signature over [`Annotation::signing_bytes`], empty until signed.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Attach a signature produced over [`Annotation::signing_bytes`].
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Canonical content covered by the signature: the JSON encoding of the
    /// annotation with `signature` cleared.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let unsigned = Annotation {
            signature: String::new(),
            ..self.clone()
        };
        Ok(serde_json::to_vec(&unsigned)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an annotation, rejecting unknown `hash`, `kind` or `layer` values.
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// An ordered envelope of zero or more annotations; the unit of publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationList {
    #[serde(default)]
    pub items: Vec<Annotation>,
}

impl AnnotationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.items.iter()
    }
}

impl From<Vec<Annotation>> for AnnotationList {
    fn from(items: Vec<Annotation>) -> Self {
        Self { items }
    }
}

impl IntoIterator for AnnotationList {
    type Item = Annotation;
    type IntoIter = std::vec::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage(hash: HashType) -> Lineage {
        Lineage::new("b94d27b9934d3e08", hash, "node-1", "commit-abc")
    }

    #[test]
    fn test_new_annotation_copies_lineage() {
        let l = lineage(HashType::Sha256);
        let a = Annotation::new(&l, LayerType::Application, AnnotationType::Tpm, true);
        assert_eq!(a.key, l.key);
        assert_eq!(a.host, "node-1");
        assert_eq!(a.tag, "commit-abc");
        assert_eq!(a.timestamp(), l.timestamp);
        assert!(a.is_satisfied);
        assert!(!a.is_signed());
    }

    #[test]
    fn test_ids_are_unique_within_lineage() {
        let l = lineage(HashType::Md5);
        let a = Annotation::new(&l, LayerType::Os, AnnotationType::Pki, true);
        let b = Annotation::new(&l, LayerType::Os, AnnotationType::Pki, true);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_json_roundtrip_every_hash_and_kind() {
        for hash in HashType::ALL {
            for kind in AnnotationType::ALL {
                let a = Annotation::new(&lineage(*hash), LayerType::CiCd, *kind, false)
                    .with_signature("deadbeef");
                let json = a.to_json().unwrap();
                let back = Annotation::from_json(&json).unwrap();
                assert_eq!(a, back);
            }
        }
    }

    #[test]
    fn test_json_field_names() {
        let a = Annotation::new(&lineage(HashType::Sha256), LayerType::Host, AnnotationType::Tls, true);
        let v: serde_json::Value = serde_json::from_str(&a.to_json().unwrap()).unwrap();
        for field in [
            "id", "key", "hash", "host", "tag", "layer", "kind", "signature", "isSatisfied",
            "timestamp",
        ] {
            assert!(v.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_invalid_hash_or_kind_fails_to_parse() {
        let a = Annotation::new(
            &lineage(HashType::Sha256),
            LayerType::Application,
            AnnotationType::Source,
            true,
        );
        let mut v: serde_json::Value = serde_json::from_str(&a.to_json().unwrap()).unwrap();

        let mut bad_hash = v.clone();
        bad_hash["hash"] = "invalid".into();
        let err = Annotation::from_json(&bad_hash.to_string()).unwrap_err();
        assert!(err.to_string().contains("invalid"));

        v["kind"] = "invalid".into();
        assert!(Annotation::from_json(&v.to_string()).is_err());
    }

    #[test]
    fn test_signing_bytes_ignore_signature() {
        let a = Annotation::new(&lineage(HashType::None), LayerType::Application, AnnotationType::Pki, true);
        let signed = a.clone().with_signature("cafe");
        assert_eq!(a.signing_bytes().unwrap(), signed.signing_bytes().unwrap());
        assert_eq!(signed.signature(), "cafe");
    }

    #[test]
    fn test_list_serializes_items() {
        let mut list = AnnotationList::new();
        assert!(list.is_empty());
        list.push(Annotation::new(&lineage(HashType::Md5), LayerType::Os, AnnotationType::Source, true));
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with("{\"items\":["));
        let back: AnnotationList = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
    }
}
