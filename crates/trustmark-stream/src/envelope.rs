//! The publication envelope.
//!
//! Every send carries exactly one annotation list tagged with the SDK action
//! that produced it:
//!
//! ```json
//! { "action": "create", "messageType": "AnnotationList", "content": { "items": [...] } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use trustmark_core::AnnotationList;

use crate::error::Result;

/// Message type carried by every envelope the SDK produces.
pub const ANNOTATION_LIST_MESSAGE: &str = "AnnotationList";

/// The lifecycle step that produced a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkAction {
    Create,
    Mutate,
    Transit,
    Publish,
}

impl SdkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdkAction::Create => "create",
            SdkAction::Mutate => "mutate",
            SdkAction::Transit => "transit",
            SdkAction::Publish => "publish",
        }
    }
}

impl fmt::Display for SdkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub action: SdkAction,
    pub message_type: String,
    pub content: AnnotationList,
}

impl Envelope {
    pub fn new(action: SdkAction, content: AnnotationList) -> Self {
        Self {
            action,
            message_type: ANNOTATION_LIST_MESSAGE.to_string(),
            content,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustmark_core::{Annotation, AnnotationType, HashType, LayerType, Lineage};

    #[test]
    fn test_envelope_wire_shape() {
        let lineage = Lineage::new("k", HashType::Sha256, "host", "");
        let list = AnnotationList::from(vec![Annotation::new(
            &lineage,
            LayerType::Application,
            AnnotationType::Source,
            true,
        )]);
        let env = Envelope::new(SdkAction::Transit, list);
        let v: serde_json::Value = serde_json::from_slice(&env.to_bytes().unwrap()).unwrap();
        assert_eq!(v["action"], "transit");
        assert_eq!(v["messageType"], "AnnotationList");
        assert_eq!(v["content"]["items"][0]["kind"], "src");
        assert_eq!(Envelope::from_bytes(&env.to_bytes().unwrap()).unwrap(), env);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let raw = br#"{"action":"delete","messageType":"AnnotationList","content":{"items":[]}}"#;
        assert!(Envelope::from_bytes(raw).is_err());
    }
}
