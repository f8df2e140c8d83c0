//! In-memory stream.
//!
//! Records every envelope it is handed and never fails. Clones share the
//! same sink, so a test can keep a handle while the SDK owns another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use trustmark_core::{MockStreamConfig, StreamType};

use crate::envelope::Envelope;
use crate::error::Result;
use crate::traits::StreamProvider;

#[derive(Clone, Default)]
pub struct MockStream {
    published: Arc<Mutex<Vec<Vec<u8>>>>,
    connected: Arc<AtomicBool>,
}

impl MockStream {
    pub fn new(_config: &MockStreamConfig) -> Self {
        Self::default()
    }

    fn sink(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        // A poisoned sink still holds every payload recorded before the panic.
        self.published.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Raw payloads in publication order.
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.sink().clone()
    }

    /// Decoded envelopes in publication order.
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.sink()
            .iter()
            .filter_map(|p| Envelope::from_bytes(p).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sink().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProvider for MockStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Mock
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, envelope: &Envelope) -> Result<()> {
        let payload = envelope.to_bytes()?;
        self.sink().push(payload);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
