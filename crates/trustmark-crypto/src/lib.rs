//! # trustmark crypto
//!
//! Hash and signature providers for trustmark annotations.
//!
//! ## Overview
//!
//! - [`HashProvider`] derives an annotation key from a payload (md5, sha256,
//!   or the explicit `none` pass-through).
//! - [`SignatureProvider`] signs annotation content and verifies signatures
//!   under Ed25519, ECDSA P-256 with X.509-carried public keys, or ECDSA
//!   secp256k1.
//! - [`PublicKey`] decodes verifying keys in each algorithm's on-disk shape.
//!
//! Factories take the typed algorithm from configuration. The `*_for`
//! variants accept a raw name and reject unknown names with
//! [`CryptoError::InvalidType`] before touching the filesystem.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trustmark_core::{KeyAlgorithm, KeyInfo};
//! use trustmark_crypto::{new_signature_provider, decode_signature};
//!
//! let signer = new_signature_provider(&KeyInfo::new(KeyAlgorithm::Ed25519, "keys/private.key")).unwrap();
//! let sig = signer.sign(b"payload").unwrap();
//! let ok = signer
//!     .verify(b"payload", &decode_signature(&sig).unwrap(), &signer.public_key())
//!     .unwrap();
//! assert!(ok);
//! ```

pub mod error;
pub mod hash;
pub mod keys;
pub mod signature;

pub use error::{CryptoError, Result};
pub use hash::{hash_provider_for, new_hash_provider, HashProvider};
pub use keys::{read_key_file, PublicKey};
pub use signature::{
    decode_signature, new_signature_provider, signature_provider_for, EcdsaX509Provider,
    Ed25519Provider, Secp256k1Provider, SignatureProvider,
};
