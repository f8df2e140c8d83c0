//! # trustmark
//!
//! Trust annotations for data in motion.
//!
//! ## Overview
//!
//! For each data item an application hands to the SDK, every configured
//! annotator evaluates one criterion (was the payload signed, did it arrive
//! over verified TLS, does the host have a TPM, ...). The resulting
//! annotations share one lineage, are signed individually, and are
//! published together as one annotation list.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trustmark::{AnnotationContext, Sdk};
//! use trustmark::core::SdkInfo;
//! use trustmark::stream::StreamRegistry;
//!
//! async fn example(config_json: &str) {
//!     let cfg = SdkInfo::from_json(config_json).unwrap();
//!     let sdk = Sdk::from_config(&cfg, &StreamRegistry::new()).unwrap();
//!
//!     sdk.connect().await.unwrap();
//!     let list = sdk
//!         .create(&AnnotationContext::new(), b"payload")
//!         .await
//!         .unwrap();
//!     assert_eq!(list.len(), cfg.annotators.len());
//!     sdk.close().await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `trustmark::core` - Types, annotations, configuration, tag resolution
//! - `trustmark::crypto` - Hash and signature providers
//! - `trustmark::stream` - Stream providers and registry
//! - `trustmark::httpsig` - HTTP message-signature verification

pub mod annotators;
pub mod context;
pub mod error;
pub mod logging;
pub mod sdk;

pub use trustmark_core as core;
pub use trustmark_crypto as crypto;
pub use trustmark_http as httpsig;
pub use trustmark_stream as stream;

pub use annotators::{annotator_for, new_annotator, Annotator, AnnotatorError, Signable};
pub use context::{AnnotationContext, TlsFacts, TpmFacts};
pub use error::{Result, SdkError};
pub use sdk::{Sdk, SdkBuilder};

pub use trustmark_core::{
    Annotation, AnnotationList, AnnotationType, HashType, KeyAlgorithm, LayerType, SdkInfo,
    StreamType,
};
