//! # trustmark stream
//!
//! Publication sinks for trustmark annotation lists.
//!
//! ## Overview
//!
//! Every sink implements the [`StreamProvider`] trait: `connect`, `send` one
//! [`Envelope`], `close`. Streams are built from typed configuration by a
//! [`StreamRegistry`], which also serves as the extension point for sinks
//! that are recognized but not built in.
//!
//! ## Key Types
//!
//! - [`StreamProvider`] - The async trait for all sinks
//! - [`StreamExt`] - Scoped connect/send/close
//! - [`MockStream`] - In-memory sink for tests
//! - [`ConsoleStream`] - JSON lines on stdout
//! - [`MqttStream`] - MQTT broker publisher
//! - [`HederaStream`] - Consensus-topic publisher over a [`LedgerClient`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trustmark_core::{AnnotationList, StreamInfo};
//! use trustmark_stream::{Envelope, SdkAction, StreamExt, StreamRegistry};
//!
//! async fn example() {
//!     let registry = StreamRegistry::new();
//!     let stream = registry.build(&StreamInfo::Console(Default::default())).unwrap();
//!     let envelope = Envelope::new(SdkAction::Create, AnnotationList::new());
//!     stream.send_scoped(&envelope).await.unwrap();
//! }
//! ```

pub mod console;
pub mod envelope;
pub mod error;
pub mod hedera;
pub mod mock;
pub mod mqtt;
pub mod registry;
pub mod traits;

pub use console::ConsoleStream;
pub use envelope::{Envelope, SdkAction, ANNOTATION_LIST_MESSAGE};
pub use error::{Result, StreamError};
pub use hedera::{
    DetachedLedger, EntityId, HederaStream, LedgerClient, LedgerError, LedgerSubmission,
    MemoryLedger,
};
pub use mock::MockStream;
pub use mqtt::MqttStream;
pub use registry::StreamRegistry;
pub use traits::{StreamExt, StreamProvider};
