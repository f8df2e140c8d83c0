//! Typed provider configuration.
//!
//! Configuration arrives already parsed; nothing in the SDK opens a
//! configuration file. Each provider kind has exactly one payload shape, and
//! stream configuration is a tagged union so that a payload that does not
//! match its declared type is rejected at the boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{AnnotationType, HashType, KeyAlgorithm, LayerType, NetType, StreamType};

/// Location and algorithm of one piece of key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    #[serde(rename = "type")]
    pub kind: KeyAlgorithm,
    pub path: PathBuf,
}

impl KeyInfo {
    pub fn new(kind: KeyAlgorithm, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Key material used to sign annotations and verify signed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub public_key: KeyInfo,
    pub private_key: KeyInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashInfo {
    #[serde(rename = "type")]
    pub kind: HashType,
}

/// Payload types for streams without options. The `config` member may be
/// absent, `null`, or an object whose keys are ignored.
macro_rules! optionless_config {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
        pub struct $name {}

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                struct Ignored {}
                Option::<Ignored>::deserialize(deserializer).map(|_| $name {})
            }
        }
    )+};
}

optionless_config! {
    /// In-memory sink.
    MockStreamConfig;
    /// JSON lines on stdout.
    ConsoleStreamConfig;
    /// Recognized, not built.
    PravegaConfig;
}

/// Broker endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    pub host: String,
    pub protocol: String,
    pub port: u16,
}

impl ServiceInfo {
    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Whether the protocol asks for a TLS transport.
    pub fn is_tls(&self) -> bool {
        matches!(self.protocol.as_str(), "ssl" | "tls" | "mqtts")
    }
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            protocol: "tcp".to_string(),
            port: 1883,
        }
    }
}

/// TLS material for an MQTT session, read when the stream is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MqttTlsConfig {
    pub ca_path: PathBuf,
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MqttConfig {
    pub client_id: String,
    pub user: String,
    pub password: String,
    pub qos: u8,
    pub is_retained: bool,
    pub provider: ServiceInfo,
    pub cleanness: bool,
    pub topics: Vec<String>,
    pub tls: Option<MqttTlsConfig>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            client_id: "trustmark".to_string(),
            user: String::new(),
            password: String::new(),
            qos: 1,
            is_retained: false,
            provider: ServiceInfo::default(),
            cleanness: true,
            topics: vec!["trustmark/annotations".to_string()],
            tls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HederaConfig {
    pub net_type: NetType,
    /// Operator account, `shard.realm.num`.
    pub account_id: String,
    pub private_key_path: PathBuf,
    /// Consensus topics, `shard.realm.num` each.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Maximum fee per submission, in tinybars. Zero leaves it to the client.
    #[serde(default)]
    pub default_max_tx_fee: u64,
}

/// Stream selection: the type tag together with its matching payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum StreamInfo {
    Mock(MockStreamConfig),
    Console(ConsoleStreamConfig),
    Mqtt(MqttConfig),
    Hedera(HederaConfig),
    Pravega(PravegaConfig),
}

impl StreamInfo {
    pub fn stream_type(&self) -> StreamType {
        match self {
            StreamInfo::Mock(_) => StreamType::Mock,
            StreamInfo::Console(_) => StreamType::Console,
            StreamInfo::Mqtt(_) => StreamType::Mqtt,
            StreamInfo::Hedera(_) => StreamType::Hedera,
            StreamInfo::Pravega(_) => StreamType::Pravega,
        }
    }

    /// Assemble stream configuration from a raw type tag and payload.
    ///
    /// An unknown tag fails with [`ConfigError::InvalidType`]; a payload whose
    /// shape does not match the tag fails with [`ConfigError::Mismatch`].
    pub fn from_parts(kind: &str, config: Value) -> Result<Self, ConfigError> {
        let kind: StreamType = kind.parse()?;
        let doc = if config.is_null() {
            serde_json::json!({ "type": kind.as_str() })
        } else {
            serde_json::json!({ "type": kind.as_str(), "config": config })
        };
        serde_json::from_value(doc).map_err(|e| ConfigError::Mismatch {
            kind,
            reason: e.to_string(),
        })
    }
}

/// Ambient logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingInfo {
    pub min_log_level: String,
}

impl Default for LoggingInfo {
    fn default() -> Self {
        Self {
            min_log_level: "info".to_string(),
        }
    }
}

/// Complete SDK configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkInfo {
    /// Annotators to run, in order.
    pub annotators: Vec<AnnotationType>,
    pub hash: HashInfo,
    pub signature: SignatureInfo,
    pub stream: StreamInfo,
    #[serde(default)]
    pub layer: LayerType,
    #[serde(default)]
    pub logging: LoggingInfo,
}

impl SdkInfo {
    /// Parse configuration text that the host has already loaded.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_info_tagged_shape() {
        let info: StreamInfo = serde_json::from_value(json!({
            "type": "mqtt",
            "config": { "clientId": "node-7", "topics": ["a", "b"] }
        }))
        .unwrap();
        match &info {
            StreamInfo::Mqtt(cfg) => {
                assert_eq!(cfg.client_id, "node-7");
                assert_eq!(cfg.topics, vec!["a", "b"]);
                assert_eq!(cfg.provider.port, 1883);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(info.stream_type(), StreamType::Mqtt);

        let console: StreamInfo = serde_json::from_value(json!({ "type": "console" })).unwrap();
        assert_eq!(console, StreamInfo::Console(ConsoleStreamConfig {}));
    }

    #[test]
    fn test_optionless_streams_accept_any_empty_payload() {
        for config in [json!({}), Value::Null, json!({ "ignored": true })] {
            for (kind, expected) in [
                ("console", StreamType::Console),
                ("mock", StreamType::Mock),
                ("pravega", StreamType::Pravega),
            ] {
                let info = StreamInfo::from_parts(kind, config.clone()).unwrap();
                assert_eq!(info.stream_type(), expected, "{kind} {config}");
            }
        }
        let mock: StreamInfo = serde_json::from_value(json!({ "type": "mock" })).unwrap();
        assert_eq!(mock, StreamInfo::Mock(MockStreamConfig {}));

        let console: StreamInfo =
            serde_json::from_value(json!({ "type": "console", "config": {} })).unwrap();
        assert_eq!(serde_json::to_value(&console).unwrap(), json!({ "type": "console", "config": {} }));
    }

    #[test]
    fn test_from_parts_rejects_invalid_tag() {
        let err = StreamInfo::from_parts("invalid", json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType(_)));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_payload() {
        // A hedera stream requires an account and a key path.
        let err = StreamInfo::from_parts("hedera", json!({ "clientId": "x" })).unwrap_err();
        assert!(matches!(err, ConfigError::Mismatch { kind: StreamType::Hedera, .. }));
    }

    #[test]
    fn test_from_parts_accepts_recognized_unimplemented() {
        let info = StreamInfo::from_parts("pravega", Value::Null).unwrap();
        assert_eq!(info.stream_type(), StreamType::Pravega);
    }

    #[test]
    fn test_sdk_info_from_json() {
        let cfg = SdkInfo::from_json(
            r#"{
                "annotators": ["tpm", "src", "pki"],
                "hash": { "type": "sha256" },
                "signature": {
                    "publicKey": { "type": "ed25519", "path": "/keys/public.key" },
                    "privateKey": { "type": "ed25519", "path": "/keys/private.key" }
                },
                "stream": { "type": "mock", "config": {} },
                "layer": "os"
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.annotators,
            vec![AnnotationType::Tpm, AnnotationType::Source, AnnotationType::Pki]
        );
        assert_eq!(cfg.hash.kind, HashType::Sha256);
        assert_eq!(cfg.layer, LayerType::Os);
        assert_eq!(cfg.logging.min_log_level, "info");
    }

    #[test]
    fn test_sdk_info_rejects_unknown_key_type() {
        let err = SdkInfo::from_json(
            r#"{
                "annotators": [],
                "hash": { "type": "md5" },
                "signature": {
                    "publicKey": { "type": "invalid", "path": "a" },
                    "privateKey": { "type": "ed25519", "path": "b" }
                },
                "stream": { "type": "console", "config": {} }
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid key algorithm value"));
    }
}
