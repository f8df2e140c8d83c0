//! Standard output stream: one JSON envelope per line.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use trustmark_core::StreamType;

use crate::envelope::Envelope;
use crate::error::{Result, StreamError};
use crate::traits::StreamProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleStream;

impl ConsoleStream {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StreamProvider for ConsoleStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Console
    }

    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn send(&self, envelope: &Envelope) -> Result<()> {
        let mut line = envelope.to_bytes()?;
        line.push(b'\n');
        let mut out = tokio::io::stdout();
        out.write_all(&line)
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
