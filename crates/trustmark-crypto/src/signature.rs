//! Signature providers: sign annotation content and verify signatures.
//!
//! Signatures travel as lowercase hex. Ed25519 signatures are the raw 64
//! bytes; both ECDSA variants use DER.

use std::path::{Path, PathBuf};

use ed25519_dalek::Signer;
use tracing::debug;
use trustmark_core::{KeyAlgorithm, KeyInfo};

use crate::error::{CryptoError, Result};
use crate::keys::{
    ed25519_signing_key, p256_signing_key, read_key_file, secp256k1_signing_key, PublicKey,
};

/// Signs and verifies byte payloads under one key algorithm.
pub trait SignatureProvider: Send + Sync {
    fn algorithm(&self) -> KeyAlgorithm;

    /// The public half of the signing key.
    fn public_key(&self) -> PublicKey;

    /// Sign `data`, returning the hex-encoded signature.
    fn sign(&self, data: &[u8]) -> Result<String>;

    /// Verify `signature` (raw bytes) over `data` against `public_key`.
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &PublicKey) -> Result<bool> {
        if public_key.algorithm() != self.algorithm() {
            return Err(CryptoError::KeyMismatch {
                expected: self.algorithm(),
                actual: public_key.algorithm(),
            });
        }
        public_key.verify(data, signature)
    }
}

/// Decode a hex signature as produced by [`SignatureProvider::sign`].
pub fn decode_signature(signature: &str) -> Result<Vec<u8>> {
    hex::decode(signature.trim()).map_err(|e| CryptoError::MalformedSignature(e.to_string()))
}

pub struct Ed25519Provider {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Provider {
    pub fn new(key: ed25519_dalek::SigningKey) -> Self {
        Self { key }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(ed25519_signing_key(&read_key_file(path)?)?))
    }
}

impl SignatureProvider for Ed25519Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(self.key.verifying_key())
    }

    fn sign(&self, data: &[u8]) -> Result<String> {
        Ok(hex::encode(self.key.sign(data).to_bytes()))
    }
}

/// ECDSA over P-256; the matching public key ships in an X.509 certificate.
pub struct EcdsaX509Provider {
    key: p256::ecdsa::SigningKey,
}

impl EcdsaX509Provider {
    pub fn new(key: p256::ecdsa::SigningKey) -> Self {
        Self { key }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(p256_signing_key(&read_key_file(path)?)?))
    }
}

impl SignatureProvider for EcdsaX509Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::EcdsaX509
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::EcdsaX509(self.key.verifying_key().clone())
    }

    fn sign(&self, data: &[u8]) -> Result<String> {
        let sig: p256::ecdsa::Signature = self
            .key
            .try_sign(data)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(hex::encode(sig.to_der().as_bytes()))
    }
}

pub struct Secp256k1Provider {
    key: k256::ecdsa::SigningKey,
}

impl Secp256k1Provider {
    pub fn new(key: k256::ecdsa::SigningKey) -> Self {
        Self { key }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(secp256k1_signing_key(&read_key_file(path)?)?))
    }
}

impl SignatureProvider for Secp256k1Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::EcdsaSecp256k1
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::EcdsaSecp256k1(self.key.verifying_key().clone())
    }

    fn sign(&self, data: &[u8]) -> Result<String> {
        let sig: k256::ecdsa::Signature = self
            .key
            .try_sign(data)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(hex::encode(sig.to_der().as_bytes()))
    }
}

/// Instantiate the provider for `key`, loading the private key from disk.
///
/// Read failures surface as [`CryptoError::Io`], undecodable material as
/// [`CryptoError::MalformedKey`].
pub fn new_signature_provider(key: &KeyInfo) -> Result<Box<dyn SignatureProvider>> {
    let provider: Box<dyn SignatureProvider> = match key.kind {
        KeyAlgorithm::Ed25519 => Box::new(Ed25519Provider::load(&key.path)?),
        KeyAlgorithm::EcdsaX509 => Box::new(EcdsaX509Provider::load(&key.path)?),
        KeyAlgorithm::EcdsaSecp256k1 => Box::new(Secp256k1Provider::load(&key.path)?),
    };
    debug!(algorithm = %key.kind, path = ?key.path, "signature provider ready");
    Ok(provider)
}

/// Instantiate the provider named `kind`, rejecting unknown names before any
/// key material is read.
pub fn signature_provider_for(
    kind: &str,
    path: impl Into<PathBuf>,
) -> Result<Box<dyn SignatureProvider>> {
    let kind: KeyAlgorithm = kind.parse()?;
    new_signature_provider(&KeyInfo::new(kind, path))
}
