//! # trustmark core
//!
//! Pure primitives for the trustmark annotation SDK: the closed type
//! registry, the annotation data model, tag resolution, and typed provider
//! configuration.
//!
//! This crate performs no network I/O and loads no key material.
//!
//! ## Key Types
//!
//! - [`Annotation`] - One signed assertion about one data item at one layer
//! - [`AnnotationList`] - The unit of publication to a stream
//! - [`Lineage`] - The key/hash/host/tag/timestamp stamp shared by one item
//! - [`TagResolver`] - Per-layer tag lookup, swappable via [`SharedTagResolver`]
//! - [`SdkInfo`] - Complete, already-parsed SDK configuration

pub mod annotation;
pub mod config;
pub mod error;
pub mod tag;
pub mod types;

pub use annotation::{Annotation, AnnotationList, Lineage};
pub use config::{
    ConsoleStreamConfig, HashInfo, HederaConfig, KeyInfo, LoggingInfo, MockStreamConfig,
    MqttConfig, MqttTlsConfig, PravegaConfig, SdkInfo, ServiceInfo, SignatureInfo, StreamInfo,
};
pub use error::{ConfigError, CoreError, InvalidTypeError};
pub use tag::{
    EnvTagResolver, FnTagResolver, LayeredTagResolver, SharedTagResolver, TagResolver,
    TAG_ENV_KEY,
};
pub use types::{
    AnnotationType, DerivedComponent, HashType, KeyAlgorithm, LayerType, NetType, StreamType,
};
