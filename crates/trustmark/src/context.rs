//! Per-item inputs that some annotators need besides the data itself.
//!
//! Attestation facts are gathered by the host and handed in already
//! evaluated; the SDK does not talk to TLS stacks or TPM devices.

use bytes::Bytes;
use http::Request;

/// Outcome of the transport handshake the data arrived over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsFacts {
    pub handshake_complete: bool,
    /// The peer presented a certificate that chained to a trusted root.
    pub peer_verified: bool,
}

/// Platform attestation for the annotating host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TpmFacts {
    pub device_present: bool,
    pub quote_verified: bool,
}

#[derive(Debug, Default)]
pub struct AnnotationContext {
    pub request: Option<Request<Bytes>>,
    pub tls: Option<TlsFacts>,
    pub tpm: Option<TpmFacts>,
}

impl AnnotationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The inbound request the data was carried in, for `pki-http`.
    pub fn with_request(mut self, request: Request<Bytes>) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_tls(mut self, facts: TlsFacts) -> Self {
        self.tls = Some(facts);
        self
    }

    pub fn with_tpm(mut self, facts: TpmFacts) -> Self {
        self.tpm = Some(facts);
        self
    }
}
