//! Stream construction keyed by stream type.
//!
//! A registry maps each [`StreamType`] to a constructor. The default set
//! covers mock, console, MQTT and the ledger stream. Until a
//! [`LedgerClient`] is supplied the ledger stream submits through
//! [`DetachedLedger`] and every publish fails as a transport error. A
//! recognized type with no constructor, such as `pravega`, fails with
//! [`StreamError::Unimplemented`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use trustmark_core::{StreamInfo, StreamType};

use crate::console::ConsoleStream;
use crate::error::{Result, StreamError};
use crate::hedera::{DetachedLedger, HederaStream, LedgerClient};
use crate::mock::MockStream;
use crate::mqtt::MqttStream;
use crate::traits::StreamProvider;

type Constructor = Box<dyn Fn(&StreamInfo) -> Result<Arc<dyn StreamProvider>> + Send + Sync>;

pub struct StreamRegistry {
    constructors: HashMap<StreamType, Constructor>,
}

fn mismatch(expected: StreamType, info: &StreamInfo) -> StreamError {
    StreamError::Configuration(format!(
        "{expected} constructor handed {} configuration",
        info.stream_type()
    ))
}

impl StreamRegistry {
    /// A registry with no constructors at all.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Every built-in stream.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(StreamType::Mock, |info| match info {
            StreamInfo::Mock(cfg) => Ok(Arc::new(MockStream::new(cfg)) as Arc<dyn StreamProvider>),
            other => Err(mismatch(StreamType::Mock, other)),
        });
        registry.register(StreamType::Console, |info| match info {
            StreamInfo::Console(_) => Ok(Arc::new(ConsoleStream::new()) as Arc<dyn StreamProvider>),
            other => Err(mismatch(StreamType::Console, other)),
        });
        registry.register(StreamType::Mqtt, |info| match info {
            StreamInfo::Mqtt(cfg) => Ok(Arc::new(MqttStream::new(cfg)?) as Arc<dyn StreamProvider>),
            other => Err(mismatch(StreamType::Mqtt, other)),
        });
        registry.register_ledger(Arc::new(DetachedLedger));
        registry
    }

    /// Submit ledger streams through `client`.
    pub fn with_ledger_client(mut self, client: Arc<dyn LedgerClient>) -> Self {
        self.register_ledger(client);
        self
    }

    fn register_ledger(&mut self, client: Arc<dyn LedgerClient>) {
        self.register(StreamType::Hedera, move |info| match info {
            StreamInfo::Hedera(cfg) => {
                Ok(Arc::new(HederaStream::new(cfg, client.clone())?) as Arc<dyn StreamProvider>)
            }
            other => Err(mismatch(StreamType::Hedera, other)),
        });
    }

    /// Install (or replace) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: StreamType, constructor: F)
    where
        F: Fn(&StreamInfo) -> Result<Arc<dyn StreamProvider>> + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Box::new(constructor));
    }

    pub fn is_registered(&self, kind: StreamType) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Build the stream described by `info`.
    pub fn build(&self, info: &StreamInfo) -> Result<Arc<dyn StreamProvider>> {
        let kind = info.stream_type();
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or(StreamError::Unimplemented(kind))?;
        let stream = constructor(info)?;
        debug!(stream = %kind, "stream constructed");
        Ok(stream)
    }

    /// Build from a raw type tag and payload.
    ///
    /// Unknown tags fail with [`StreamError::InvalidType`] before any
    /// payload inspection.
    pub fn build_raw(&self, kind: &str, config: Value) -> Result<Arc<dyn StreamProvider>> {
        let info = StreamInfo::from_parts(kind, config)?;
        self.build(&info)
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Envelope, SdkAction};
    use crate::hedera::MemoryLedger;
    use serde_json::json;
    use trustmark_core::AnnotationList;

    #[test]
    fn test_default_registry_builds_each_type() {
        let registry = StreamRegistry::new();
        assert_eq!(
            registry.build_raw("mock", json!({})).unwrap().stream_type(),
            StreamType::Mock
        );
        assert_eq!(
            registry.build_raw("console", Value::Null).unwrap().stream_type(),
            StreamType::Console
        );
        assert_eq!(
            registry.build_raw("console", json!({})).unwrap().stream_type(),
            StreamType::Console
        );
        assert_eq!(
            registry.build_raw("mqtt", json!({})).unwrap().stream_type(),
            StreamType::Mqtt
        );
        assert!(registry.is_registered(StreamType::Hedera));
        assert!(!registry.is_registered(StreamType::Pravega));
    }

    #[test]
    fn test_invalid_type() {
        let err = StreamRegistry::new().build_raw("invalid", json!({})).err().unwrap();
        assert!(matches!(err, StreamError::InvalidType(_)));
    }

    #[test]
    fn test_recognized_but_unimplemented() {
        let err = StreamRegistry::new().build_raw("pravega", Value::Null).err().unwrap();
        assert!(matches!(err, StreamError::Unimplemented(StreamType::Pravega)));
    }

    #[tokio::test]
    async fn test_default_registry_builds_hedera() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("operator.key");
        std::fs::write(&key, hex::encode([5u8; 32])).unwrap();
        let cfg = json!({
            "netType": "local",
            "accountId": "0.0.1001",
            "privateKeyPath": key,
            "topics": ["0.0.5001"],
        });

        let detached = StreamRegistry::new().build_raw("hedera", cfg.clone()).unwrap();
        assert_eq!(detached.stream_type(), StreamType::Hedera);
        detached.connect().await.unwrap();
        let env = Envelope::new(SdkAction::Create, AnnotationList::new());
        assert!(matches!(detached.send(&env).await, Err(StreamError::Transport(_))));

        let ledger = Arc::new(MemoryLedger::new());
        let registry = StreamRegistry::new().with_ledger_client(ledger.clone());
        let stream = registry.build_raw("hedera", cfg).unwrap();
        stream.connect().await.unwrap();
        stream.send(&env).await.unwrap();
        assert_eq!(ledger.accepted().len(), 1);
    }

    #[test]
    fn test_mismatched_payload() {
        let err = StreamRegistry::new()
            .build_raw("mqtt", json!({ "qos": "high" }))
            .err()
            .unwrap();
        assert!(matches!(err, StreamError::Configuration(_)));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = StreamRegistry::empty();
        assert!(!registry.is_registered(StreamType::Mock));
        registry.register(StreamType::Mock, |_| Ok(Arc::new(MockStream::default()) as Arc<dyn StreamProvider>));
        assert!(registry.build(&StreamInfo::Mock(Default::default())).is_ok());
    }
}
