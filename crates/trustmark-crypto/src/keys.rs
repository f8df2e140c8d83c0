//! Key material loading.
//!
//! Each algorithm has its own on-disk shape:
//!
//! | algorithm         | private key                         | public key                         |
//! |-------------------|-------------------------------------|------------------------------------|
//! | `ed25519`         | hex, 32-byte seed or seed‖public    | hex, 32 bytes                      |
//! | `ecdsa-x509`      | PEM or DER, PKCS#8 or SEC1 (P-256)  | X.509 certificate, PEM or DER      |
//! | `ecdsa-secp256k1` | hex, 32-byte scalar                 | hex, SEC1 point                    |

use std::fmt;
use std::path::Path;

use ed25519_dalek::Verifier;
use p256::pkcs8::DecodePrivateKey;
use trustmark_core::{KeyAlgorithm, KeyInfo};
use x509_parser::certificate::X509Certificate;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::FromDer;

use crate::error::{CryptoError, Result};

/// Read raw key material, mapping failures to [`CryptoError::Io`].
pub fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_hex(algorithm: KeyAlgorithm, material: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(material)
        .map_err(|_| CryptoError::malformed_key(algorithm, "expected hex text"))?;
    hex::decode(text.trim()).map_err(|e| CryptoError::malformed_key(algorithm, e))
}

fn is_pem(material: &[u8]) -> bool {
    material
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| material[start..].starts_with(b"-----BEGIN"))
        .unwrap_or(false)
}

/// Parse an Ed25519 signing key from hex text.
///
/// Accepts a 32-byte seed or the 64-byte seed‖public-key form; for the
/// latter the embedded public key must match the seed.
pub fn ed25519_signing_key(material: &[u8]) -> Result<ed25519_dalek::SigningKey> {
    let alg = KeyAlgorithm::Ed25519;
    let bytes = decode_hex(alg, material)?;
    match bytes.len() {
        32 | 64 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes[..32]);
            let key = ed25519_dalek::SigningKey::from_bytes(&seed);
            if bytes.len() == 64 && key.verifying_key().as_bytes() != &bytes[32..] {
                return Err(CryptoError::malformed_key(
                    alg,
                    "embedded public key does not match seed",
                ));
            }
            Ok(key)
        }
        n => Err(CryptoError::malformed_key(
            alg,
            format!("expected 32 or 64 bytes, got {n}"),
        )),
    }
}

/// Parse a P-256 signing key from PEM or DER (PKCS#8 or SEC1).
pub fn p256_signing_key(material: &[u8]) -> Result<p256::ecdsa::SigningKey> {
    let alg = KeyAlgorithm::EcdsaX509;
    let secret = if is_pem(material) {
        let text = std::str::from_utf8(material)
            .map_err(|_| CryptoError::malformed_key(alg, "PEM is not valid UTF-8"))?;
        p256::SecretKey::from_pkcs8_pem(text)
            .or_else(|_| p256::SecretKey::from_sec1_pem(text))
            .map_err(|e| CryptoError::malformed_key(alg, e))?
    } else {
        p256::SecretKey::from_pkcs8_der(material)
            .or_else(|_| p256::SecretKey::from_sec1_der(material))
            .map_err(|e| CryptoError::malformed_key(alg, e))?
    };
    Ok(p256::ecdsa::SigningKey::from(secret))
}

/// Parse a secp256k1 signing key from hex text.
pub fn secp256k1_signing_key(material: &[u8]) -> Result<k256::ecdsa::SigningKey> {
    let alg = KeyAlgorithm::EcdsaSecp256k1;
    let bytes = decode_hex(alg, material)?;
    k256::ecdsa::SigningKey::from_slice(&bytes).map_err(|e| CryptoError::malformed_key(alg, e))
}

/// Extract the P-256 verifying key from an X.509 certificate (PEM or DER).
pub fn p256_key_from_certificate(material: &[u8]) -> Result<p256::ecdsa::VerifyingKey> {
    let alg = KeyAlgorithm::EcdsaX509;
    let der = if is_pem(material) {
        let (_, pem) = parse_x509_pem(material).map_err(|e| CryptoError::malformed_key(alg, e))?;
        pem.contents
    } else {
        material.to_vec()
    };
    let (_, cert) =
        X509Certificate::from_der(&der).map_err(|e| CryptoError::malformed_key(alg, e))?;
    let point: &[u8] = cert.public_key().subject_public_key.data.as_ref();
    p256::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(|e| CryptoError::malformed_key(alg, e))
}

/// A verifying key of any supported algorithm.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    EcdsaX509(p256::ecdsa::VerifyingKey),
    EcdsaSecp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    /// Load the public key described by `info`.
    pub fn load(info: &KeyInfo) -> Result<Self> {
        let material = read_key_file(&info.path)?;
        Self::from_material(info.kind, &material)
    }

    /// Decode public key material in the on-disk shape of `algorithm`.
    pub fn from_material(algorithm: KeyAlgorithm, material: &[u8]) -> Result<Self> {
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let bytes = decode_hex(algorithm, material)?;
                let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                    CryptoError::malformed_key(algorithm, format!("expected 32 bytes, got {}", bytes.len()))
                })?;
                ed25519_dalek::VerifyingKey::from_bytes(&arr)
                    .map(PublicKey::Ed25519)
                    .map_err(|e| CryptoError::malformed_key(algorithm, e))
            }
            KeyAlgorithm::EcdsaX509 => p256_key_from_certificate(material).map(PublicKey::EcdsaX509),
            KeyAlgorithm::EcdsaSecp256k1 => {
                let bytes = decode_hex(algorithm, material)?;
                k256::ecdsa::VerifyingKey::from_sec1_bytes(&bytes)
                    .map(PublicKey::EcdsaSecp256k1)
                    .map_err(|e| CryptoError::malformed_key(algorithm, e))
            }
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PublicKey::Ed25519(_) => KeyAlgorithm::Ed25519,
            PublicKey::EcdsaX509(_) => KeyAlgorithm::EcdsaX509,
            PublicKey::EcdsaSecp256k1(_) => KeyAlgorithm::EcdsaSecp256k1,
        }
    }

    /// Raw key bytes: the 32-byte Ed25519 key or the compressed SEC1 point.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(k) => k.as_bytes().to_vec(),
            PublicKey::EcdsaX509(k) => k.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::EcdsaSecp256k1(k) => k.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify `signature` over `data`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match,
    /// and [`CryptoError::MalformedSignature`] when the bytes cannot be a
    /// signature for this algorithm at all.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool> {
        match self {
            PublicKey::Ed25519(key) => {
                let sig = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
                Ok(key.verify(data, &sig).is_ok())
            }
            PublicKey::EcdsaX509(key) => {
                let sig = p256::ecdsa::Signature::from_der(signature)
                    .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
                Ok(key.verify(data, &sig).is_ok())
            }
            PublicKey::EcdsaSecp256k1(key) => {
                let sig = k256::ecdsa::Signature::from_der(signature)
                    .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
                Ok(key.verify(data, &sig).is_ok())
            }
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "PublicKey({}, {}...)", self.algorithm(), &hex[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ed25519_seed_forms() {
        let seed = [0x42u8; 32];
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);

        let short = hex::encode(seed);
        assert_eq!(ed25519_signing_key(short.as_bytes()).unwrap().to_bytes(), seed);

        let mut long = seed.to_vec();
        long.extend_from_slice(key.verifying_key().as_bytes());
        let long = format!("{}\n", hex::encode(long));
        assert_eq!(ed25519_signing_key(long.as_bytes()).unwrap().to_bytes(), seed);
    }

    #[test]
    fn test_ed25519_rejects_mismatched_embedded_key() {
        let mut bytes = vec![0x42u8; 32];
        bytes.extend_from_slice(&[0u8; 32]);
        let err = ed25519_signing_key(hex::encode(bytes).as_bytes()).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedKey { .. }));
    }

    #[test]
    fn test_bad_hex_is_malformed_key() {
        let err = secp256k1_signing_key(b"not hex").unwrap_err();
        assert!(matches!(
            err,
            CryptoError::MalformedKey {
                algorithm: KeyAlgorithm::EcdsaSecp256k1,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let info = KeyInfo::new(KeyAlgorithm::Ed25519, "/nonexistent/trustmark/public.key");
        assert!(matches!(PublicKey::load(&info), Err(CryptoError::Io { .. })));
    }

    #[test]
    fn test_public_key_from_material() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        let material = hex::encode(key.verifying_key().as_bytes());
        let pk = PublicKey::from_material(KeyAlgorithm::Ed25519, material.as_bytes()).unwrap();
        assert_eq!(pk.algorithm(), KeyAlgorithm::Ed25519);
        assert_eq!(pk.to_hex(), material);
    }

    #[test]
    fn test_malformed_signature_is_error_not_false() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        let pk = PublicKey::Ed25519(key.verifying_key());
        assert!(matches!(
            pk.verify(b"data", &[1, 2, 3]),
            Err(CryptoError::MalformedSignature(_))
        ));
    }
}
