//! Hedera consensus-service stream.
//!
//! The stream owns the operator identity (account and Ed25519 key), signs
//! each payload, and submits one message per configured topic through a
//! [`LedgerClient`]. The ledger's own wire protocol lives behind that trait.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ed25519_dalek::Signer;
use thiserror::Error;
use tracing::{debug, warn};
use trustmark_core::{HederaConfig, NetType, StreamType};
use trustmark_crypto::keys::ed25519_signing_key;
use trustmark_crypto::read_key_file;

use crate::envelope::Envelope;
use crate::error::{Result, StreamError};
use crate::traits::StreamProvider;

/// DER prefix of a PKCS#8-wrapped Ed25519 private key, as exported by
/// ledger tooling. The 32-byte seed follows.
const ED25519_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// A ledger entity address, `shard.realm.num`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl FromStr for EntityId {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || StreamError::Configuration(format!("invalid entity id {s:?}"));
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64> {
            parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())
        };
        let id = EntityId {
            shard: next()?,
            realm: next()?,
            num: next()?,
        };
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// One signed topic message ready for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSubmission {
    pub network: NetType,
    pub operator: EntityId,
    pub topic: EntityId,
    pub message: Vec<u8>,
    /// Operator's Ed25519 signature over `message`.
    pub signature: Vec<u8>,
    /// Zero leaves the fee to the client.
    pub max_fee: u64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger answered with a non-success status.
    #[error("ledger rejected submission: {status}")]
    Rejected { status: String },
}

impl From<LedgerError> for StreamError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unavailable(reason) => StreamError::Transport(reason),
            LedgerError::Rejected { status } => StreamError::Rejected { status },
        }
    }
}

/// Submits topic messages to a ledger network.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit(&self, submission: &LedgerSubmission) -> std::result::Result<(), LedgerError>;
}

/// A ledger held in memory, for tests and local runs.
///
/// Accepts every submission unless primed with a failure.
#[derive(Default)]
pub struct MemoryLedger {
    accepted: Mutex<Vec<LedgerSubmission>>,
    failure: Mutex<Option<LedgerError>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent submission with `err`.
    pub fn fail_with(&self, err: LedgerError) {
        *lock(&self.failure) = Some(err);
    }

    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    pub fn accepted(&self) -> Vec<LedgerSubmission> {
        lock(&self.accepted).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn submit(&self, submission: &LedgerSubmission) -> std::result::Result<(), LedgerError> {
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }
        lock(&self.accepted).push(submission.clone());
        Ok(())
    }
}

/// Stands in until a real client is supplied; every submission fails as
/// unavailable, so the stream builds but cannot publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLedger;

#[async_trait]
impl LedgerClient for DetachedLedger {
    async fn submit(&self, _submission: &LedgerSubmission) -> std::result::Result<(), LedgerError> {
        Err(LedgerError::Unavailable("no ledger client configured".into()))
    }
}

/// Parse an operator key: hex seed, seed‖public, or DER-wrapped seed.
fn operator_key(material: &[u8]) -> Result<ed25519_dalek::SigningKey> {
    let text = String::from_utf8_lossy(material);
    let text = text.trim();
    let stripped = text
        .strip_prefix(ED25519_DER_PREFIX)
        .filter(|seed| seed.len() == 64)
        .unwrap_or(text);
    Ok(ed25519_signing_key(stripped.as_bytes())?)
}

pub struct HederaStream {
    network: NetType,
    operator: EntityId,
    key: ed25519_dalek::SigningKey,
    topics: Vec<EntityId>,
    max_fee: u64,
    client: Arc<dyn LedgerClient>,
    connected: AtomicBool,
}

impl HederaStream {
    /// Validate the configuration and load the operator key.
    pub fn new(config: &HederaConfig, client: Arc<dyn LedgerClient>) -> Result<Self> {
        let operator: EntityId = config.account_id.parse()?;
        let topics = config
            .topics
            .iter()
            .map(|t| t.parse())
            .collect::<Result<Vec<EntityId>>>()?;
        let key = operator_key(&read_key_file(&config.private_key_path)?)?;
        debug!(%operator, network = %config.net_type, topics = topics.len(), "hedera stream ready");
        Ok(Self {
            network: config.net_type,
            operator,
            key,
            topics,
            max_fee: config.default_max_tx_fee,
            client,
            connected: AtomicBool::new(false),
        })
    }

    pub fn operator(&self) -> EntityId {
        self.operator
    }

    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.key.verifying_key()
    }
}

#[async_trait]
impl StreamProvider for HederaStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Hedera
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Submissions go out topic by topic. A failure stops at that topic;
    /// messages already accepted on earlier topics stay on the ledger.
    async fn send(&self, envelope: &Envelope) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(StreamError::NotConnected);
        }
        if self.topics.is_empty() {
            return Err(StreamError::Configuration(
                "hedera stream has no topics".into(),
            ));
        }
        let message = envelope.to_bytes()?;
        let signature = self.key.sign(&message).to_bytes().to_vec();
        for topic in &self.topics {
            let submission = LedgerSubmission {
                network: self.network,
                operator: self.operator,
                topic: *topic,
                message: message.clone(),
                signature: signature.clone(),
                max_fee: self.max_fee,
            };
            if let Err(e) = self.client.submit(&submission).await {
                warn!(%topic, error = %e, "ledger submission failed");
                return Err(e.into());
            }
            debug!(%topic, bytes = message.len(), "submitted to ledger");
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
