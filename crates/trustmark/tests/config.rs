//! Building the SDK from configuration text.

use std::sync::Arc;

use serde_json::json;
use trustmark::core::{AnnotationType, KeyAlgorithm, SdkInfo};
use trustmark::stream::{MemoryLedger, StreamError, StreamRegistry};
use trustmark::{AnnotationContext, Sdk, SdkError};
use trustmark_testkit::KeyFixture;

fn config_json(keys: &KeyFixture, stream: serde_json::Value) -> String {
    json!({
        "annotators": ["src"],
        "hash": { "type": "md5" },
        "signature": {
            "publicKey": { "type": keys.algorithm.as_str(), "path": keys.public.path },
            "privateKey": { "type": keys.algorithm.as_str(), "path": keys.private.path },
        },
        "stream": stream,
        "layer": "host",
        "logging": { "minLogLevel": "debug" },
    })
    .to_string()
}

#[tokio::test]
async fn test_mock_stream_from_json() -> anyhow::Result<()> {
    let keys = KeyFixture::new(KeyAlgorithm::EcdsaX509);
    let cfg = SdkInfo::from_json(&config_json(&keys, json!({ "type": "mock", "config": {} })))?;
    assert_eq!(cfg.annotators, vec![AnnotationType::Source]);

    let sdk = Sdk::from_config(&cfg, &StreamRegistry::new())?;
    sdk.connect().await?;
    let list = sdk.create(&AnnotationContext::new(), b"hello world").await?;
    sdk.close().await?;

    let a = list.iter().next().expect("one annotation");
    assert_eq!(a.key, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    assert_eq!(a.layer.as_str(), "host");
    Ok(())
}

#[tokio::test]
async fn test_hedera_stream_from_json() -> anyhow::Result<()> {
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);
    let operator = keys.path("operator.key");
    std::fs::write(&operator, trustmark_testkit::fixtures::ED25519_PRIVATE_KEY)?;
    let cfg = SdkInfo::from_json(&config_json(
        &keys,
        json!({
            "type": "hedera",
            "config": {
                "netType": "testnet",
                "accountId": "0.0.1001",
                "privateKeyPath": operator,
                "topics": ["0.0.5001"],
            }
        }),
    ))?;

    // Without a ledger client the stream builds but cannot publish.
    let sdk = Sdk::from_config(&cfg, &StreamRegistry::new())?;
    sdk.connect().await?;
    let err = sdk.create(&AnnotationContext::new(), b"payload").await.unwrap_err();
    assert!(matches!(err, SdkError::Stream(StreamError::Transport(_))), "{err:?}");

    let ledger = Arc::new(MemoryLedger::new());
    let registry = StreamRegistry::new().with_ledger_client(ledger.clone());
    let sdk = Sdk::from_config(&cfg, &registry)?;
    sdk.connect().await?;
    sdk.create(&AnnotationContext::new(), b"payload").await?;
    assert_eq!(ledger.accepted().len(), 1);
    Ok(())
}

#[test]
fn test_console_stream_with_empty_config() -> anyhow::Result<()> {
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);
    let cfg = SdkInfo::from_json(&config_json(&keys, json!({ "type": "console", "config": {} })))?;
    let sdk = Sdk::from_config(&cfg, &StreamRegistry::new())?;
    assert_eq!(sdk.annotator_kinds(), vec![AnnotationType::Source]);
    Ok(())
}

#[test]
fn test_unknown_hash_rejected_at_parse() {
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);
    let text = config_json(&keys, json!({ "type": "console" })).replace("\"md5\"", "\"invalid\"");
    assert!(SdkInfo::from_json(&text).is_err());
}
