//! Hash providers: derive an annotation key from arbitrary bytes.

use md5::Md5;
use sha2::{Digest, Sha256};
use trustmark_core::HashType;

use crate::error::Result;

/// Computes the content hash of a payload under one algorithm.
///
/// Implementations are deterministic and side-effect free.
pub trait HashProvider: Send + Sync {
    fn hash_type(&self) -> HashType;

    /// Hash `data`, returning the string form stored in `Annotation::key`.
    fn derive(&self, data: &[u8]) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Provider;

impl HashProvider for Md5Provider {
    fn hash_type(&self) -> HashType {
        HashType::Md5
    }

    fn derive(&self, data: &[u8]) -> String {
        hex::encode(Md5::digest(data))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Provider;

impl HashProvider for Sha256Provider {
    fn hash_type(&self) -> HashType {
        HashType::Sha256
    }

    fn derive(&self, data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }
}

/// Pass-through: records explicitly that no hashing was performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneProvider;

impl HashProvider for NoneProvider {
    fn hash_type(&self) -> HashType {
        HashType::None
    }

    fn derive(&self, data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }
}

/// Instantiate the provider for `kind`.
pub fn new_hash_provider(kind: HashType) -> Box<dyn HashProvider> {
    match kind {
        HashType::Md5 => Box::new(Md5Provider),
        HashType::Sha256 => Box::new(Sha256Provider),
        HashType::None => Box::new(NoneProvider),
    }
}

/// Instantiate the provider named `kind`, rejecting unknown names.
pub fn hash_provider_for(kind: &str) -> Result<Box<dyn HashProvider>> {
    Ok(new_hash_provider(kind.parse()?))
}
