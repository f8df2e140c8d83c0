//! Request handler: verify the message signature on an inbound request.
//!
//! Verification is all-or-nothing. The key algorithm comes from the
//! handler's configuration only; a request that declares a different `alg`
//! is rejected before any cryptographic work.

use std::path::PathBuf;

use http::header::{HeaderName, HeaderValue};
use http::Request;
use tracing::{debug, warn};
use trustmark_core::{KeyAlgorithm, KeyInfo, SignatureInfo};
use trustmark_crypto::{decode_signature, CryptoError, PublicKey, SignatureProvider};

use crate::base::signature_base;
use crate::components::ComponentId;
use crate::error::{HttpSignatureError, Result};
use crate::input::{
    format_signature, parse_signature, parse_signature_input, SignatureParams, DEFAULT_LABEL,
    SIGNATURE, SIGNATURE_INPUT,
};

pub struct RequestHandler {
    public_key: PublicKey,
}

impl RequestHandler {
    /// Build a handler that verifies with the configured public key.
    pub fn new(info: &SignatureInfo) -> Result<Self> {
        Self::with_key(&info.public_key)
    }

    pub fn with_key(key: &KeyInfo) -> Result<Self> {
        let public_key = PublicKey::load(key)?;
        debug!(algorithm = %key.kind, path = ?key.path, "request handler ready");
        Ok(Self::from_public_key(public_key))
    }

    /// Build from a raw key type name; an unknown name fails with
    /// [`HttpSignatureError::InvalidKeyType`] before the key is read.
    pub fn for_key_type(kind: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let kind: KeyAlgorithm = kind.parse().map_err(HttpSignatureError::InvalidKeyType)?;
        Self::with_key(&KeyInfo::new(kind, path))
    }

    pub fn from_public_key(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.public_key.algorithm()
    }

    /// Accept the request (`Ok`) or reject it with the reason.
    ///
    /// The first member of `Signature-Input` is verified.
    pub fn validate<B>(&self, req: &Request<B>) -> Result<()> {
        let input = required_header(req, SIGNATURE_INPUT)?;
        let (label, params) = parse_signature_input(input)?
            .into_iter()
            .next()
            .ok_or_else(|| HttpSignatureError::MalformedSignatureInput("empty field".into()))?;

        if let Some(alg) = &params.alg {
            if alg != self.algorithm().as_str() {
                return Err(HttpSignatureError::AlgorithmMismatch {
                    configured: self.algorithm(),
                    declared: alg.clone(),
                });
            }
        }

        let signature = parse_signature(required_header(req, SIGNATURE)?, &label)?;
        let base = signature_base(req, &params)?;
        match self.public_key.verify(base.as_bytes(), &signature) {
            Ok(true) => {
                debug!(%label, keyid = ?params.keyid, "request signature accepted");
                Ok(())
            }
            Ok(false) | Err(CryptoError::MalformedSignature(_)) => {
                warn!(%label, keyid = ?params.keyid, method = %req.method(), path = req.uri().path(), "request signature rejected");
                Err(HttpSignatureError::InvalidSignature)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn required_header<'r, B>(req: &'r Request<B>, name: &'static str) -> Result<&'r str> {
    req.headers()
        .get(name)
        .ok_or(HttpSignatureError::MissingHeader(name))?
        .to_str()
        .map_err(|_| HttpSignatureError::InvalidHeader(name.to_string()))
}

/// Sign `req` over `components` and attach the `Signature-Input` and
/// `Signature` fields under the default label.
pub fn sign_request<B>(
    req: &mut Request<B>,
    signer: &dyn SignatureProvider,
    components: &[ComponentId],
    keyid: &str,
) -> Result<()> {
    let params = SignatureParams::new(components.to_vec())
        .with_created(chrono::Utc::now().timestamp())
        .with_keyid(keyid)
        .with_alg(signer.algorithm().as_str());
    let base = signature_base(req, &params)?;
    let signature = decode_signature(&signer.sign(base.as_bytes())?)?;

    let input = format!("{DEFAULT_LABEL}={}", params.serialize());
    let headers = req.headers_mut();
    headers.insert(
        HeaderName::from_static(SIGNATURE_INPUT),
        HeaderValue::from_str(&input)
            .map_err(|_| HttpSignatureError::InvalidHeader(SIGNATURE_INPUT.into()))?,
    );
    headers.insert(
        HeaderName::from_static(SIGNATURE),
        HeaderValue::from_str(&format_signature(DEFAULT_LABEL, &signature))
            .map_err(|_| HttpSignatureError::InvalidHeader(SIGNATURE.into()))?,
    );
    Ok(())
}
