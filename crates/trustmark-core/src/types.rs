//! The closed enumerations that every other component is keyed by.
//!
//! Each enumeration is a Rust `enum` with a fixed wire name per member.
//! Parsing an unknown string yields [`InvalidTypeError`]; `validate` is an
//! exhaustive match, so adding a member forces a review of every consumer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidTypeError;

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire name of this member.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Returns true iff `value` names a member of this enumeration.
            pub fn validate(value: &str) -> bool {
                value.parse::<Self>().is_ok()
            }
        }

        impl FromStr for $name {
            type Err = InvalidTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(InvalidTypeError::new($label, other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

closed_enum! {
    /// Which algorithm produced an annotation's key.
    pub enum HashType as "hash type" {
        Md5 => "md5",
        Sha256 => "sha256",
        /// No hashing performed; the key is the data itself.
        None => "none",
    }
}

closed_enum! {
    /// Asymmetric key algorithms for signing annotations and HTTP requests.
    pub enum KeyAlgorithm as "key algorithm" {
        Ed25519 => "ed25519",
        /// ECDSA over P-256 with the public key carried in an X.509 certificate.
        EcdsaX509 => "ecdsa-x509",
        EcdsaSecp256k1 => "ecdsa-secp256k1",
    }
}

closed_enum! {
    /// Sinks an annotation list can be published to.
    pub enum StreamType as "stream type" {
        Mock => "mock",
        Console => "console",
        Mqtt => "mqtt",
        Hedera => "hedera",
        /// Recognized extension point; no provider is built for it.
        Pravega => "pravega",
    }
}

impl StreamType {
    /// Whether a provider exists for this sink.
    pub fn is_implemented(self) -> bool {
        !matches!(self, StreamType::Pravega)
    }
}

closed_enum! {
    /// The criterion an annotation evaluates.
    pub enum AnnotationType as "annotation type" {
        Pki => "pki",
        PkiHttp => "pki-http",
        Source => "src",
        Tls => "tls",
        Tpm => "tpm",
        SourceCode => "source-code",
        Checksum => "checksum",
        Vulnerability => "vulnerability",
        Sbom => "sbom",
    }
}

impl AnnotationType {
    /// Kinds produced by CI/CD tooling for scoring consumers. The SDK
    /// accepts them on the wire but never builds an annotator for them.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            AnnotationType::SourceCode
                | AnnotationType::Checksum
                | AnnotationType::Vulnerability
                | AnnotationType::Sbom
        )
    }
}

closed_enum! {
    /// The tier of the supply chain an annotation speaks for.
    pub enum LayerType as "layer type" {
        Application => "app",
        CiCd => "cicd",
        Os => "os",
        Host => "host",
    }
}

impl Default for LayerType {
    fn default() -> Self {
        LayerType::Application
    }
}

closed_enum! {
    /// Values computed from an HTTP request rather than read from a header.
    pub enum DerivedComponent as "derived component" {
        Method => "@method",
        TargetUri => "@target-uri",
        Authority => "@authority",
        Scheme => "@scheme",
        Path => "@path",
        Query => "@query",
        QueryParams => "@query-params",
    }
}

closed_enum! {
    /// Ledger networks a Hedera stream can submit to.
    pub enum NetType as "network type" {
        Mainnet => "mainnet",
        Testnet => "testnet",
        Previewnet => "previewnet",
        Local => "local",
    }
}
