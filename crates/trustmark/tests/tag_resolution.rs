//! Tag resolution through the pipeline.

use std::sync::{Arc, Mutex};

use trustmark::core::{AnnotationType, FnTagResolver, KeyAlgorithm, LayerType, TAG_ENV_KEY};
use trustmark::stream::MockStream;
use trustmark::{AnnotationContext, Sdk};
use trustmark_testkit::KeyFixture;

// Tests in this binary share the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn sdk(keys: &KeyFixture, layer: LayerType) -> Sdk {
    let mut cfg = keys.sdk_info(&[AnnotationType::Source]);
    cfg.layer = layer;
    Sdk::builder(cfg)
        .stream(Arc::new(MockStream::default()))
        .host("node-1")
        .build()
        .unwrap()
}

async fn tag_of(sdk: &Sdk) -> String {
    let list = sdk.create(&AnnotationContext::new(), b"data").await.unwrap();
    list.iter().next().unwrap().tag.clone()
}

#[tokio::test]
async fn test_custom_resolver_then_reset() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var(TAG_ENV_KEY, "env-sha");
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);
    let sdk = sdk(&keys, LayerType::Application);

    assert_eq!(tag_of(&sdk).await, "env-sha");

    sdk.set_tag_resolver(Arc::new(FnTagResolver::new(|layer| match layer {
        LayerType::Application => "custom-sha".to_string(),
        _ => String::new(),
    })));
    assert_eq!(tag_of(&sdk).await, "custom-sha");

    sdk.reset_tag_resolver();
    assert_eq!(tag_of(&sdk).await, "env-sha");
    std::env::remove_var(TAG_ENV_KEY);
}

#[tokio::test]
async fn test_empty_custom_tag_falls_back_to_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var(TAG_ENV_KEY, "env-sha");
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);

    let sdk = sdk(&keys, LayerType::Application);
    sdk.set_tag_resolver(Arc::new(FnTagResolver::new(|_| String::new())));
    assert_eq!(tag_of(&sdk).await, "env-sha");

    // Other layers have no default.
    let os = self::sdk(&keys, LayerType::Os);
    assert_eq!(tag_of(&os).await, "");
    os.set_tag_resolver(Arc::new(FnTagResolver::new(|layer| format!("{layer}-tag"))));
    assert_eq!(tag_of(&os).await, "os-tag");
    std::env::remove_var(TAG_ENV_KEY);
}

#[tokio::test]
async fn test_builder_resolver() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let keys = KeyFixture::new(KeyAlgorithm::Ed25519);
    let mut cfg = keys.sdk_info(&[AnnotationType::Source]);
    cfg.layer = LayerType::CiCd;
    let sdk = Sdk::builder(cfg)
        .stream(Arc::new(MockStream::default()))
        .tag_resolver(Arc::new(FnTagResolver::new(|_| "pipeline-42".to_string())))
        .host("ci")
        .build()
        .unwrap();
    assert_eq!(tag_of(&sdk).await, "pipeline-42");
}
