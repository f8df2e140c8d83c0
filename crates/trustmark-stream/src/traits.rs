//! StreamProvider trait: the abstract interface for publication sinks.
//!
//! The SDK is sink-agnostic. Implementations include an in-memory mock
//! (for tests), stdout, an MQTT broker, and a distributed ledger.

use async_trait::async_trait;
use tracing::warn;
use trustmark_core::StreamType;

use crate::envelope::Envelope;
use crate::error::Result;

/// An async sink for annotation envelopes.
///
/// `connect` must succeed before `send`; `close` releases whatever `connect`
/// acquired and is safe to call on a stream that never connected.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    fn stream_type(&self) -> StreamType;

    async fn connect(&self) -> Result<()>;

    /// Publish one envelope. Each call is a single publication attempt.
    async fn send(&self, envelope: &Envelope) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Extension trait for common stream patterns.
pub trait StreamExt: StreamProvider {
    /// Connect, send one envelope, and close on every exit path.
    ///
    /// When both the send and the close fail, the send error is returned.
    fn send_scoped(
        &self,
        envelope: &Envelope,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: StreamProvider + ?Sized> StreamExt for S {
    async fn send_scoped(&self, envelope: &Envelope) -> Result<()> {
        self.connect().await?;
        let sent = self.send(envelope).await;
        if let Err(e) = self.close().await {
            if sent.is_ok() {
                return Err(e);
            }
            warn!(stream = %self.stream_type(), error = %e, "close failed after send error");
        }
        sent
    }
}
