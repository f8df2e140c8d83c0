//! # trustmark testkit
//!
//! Testing utilities for trustmark.
//!
//! ## Overview
//!
//! - **Fixtures**: fixed key pairs for every signature algorithm, written to
//!   a temporary directory on demand, SDK configuration built around them,
//!   and signed HTTP requests
//! - **Generators**: proptest strategies over the closed enumerations,
//!   lineages and payloads
//!
//! ## Test Fixtures
//!
//! ```rust
//! use trustmark_core::{AnnotationType, KeyAlgorithm};
//! use trustmark_testkit::fixtures::KeyFixture;
//!
//! let keys = KeyFixture::new(KeyAlgorithm::EcdsaX509);
//! let cfg = keys.sdk_info(&[AnnotationType::Source, AnnotationType::Pki]);
//! assert_eq!(cfg.annotators.len(), 2);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use trustmark_testkit::generators::{hash_type, payload};
//!
//! proptest! {
//!     #[test]
//!     fn hashing_is_deterministic(kind in hash_type(), data in payload(256)) {
//!         let p = trustmark_crypto::new_hash_provider(kind);
//!         prop_assert_eq!(p.derive(&data), p.derive(&data));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    all_key_fixtures, implemented_annotators, signable, signed_request, signer, test_request,
    KeyFixture,
};
