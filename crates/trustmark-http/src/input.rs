//! `Signature-Input` and `Signature` header fields.
//!
//! ```text
//! Signature-Input: sig1=("@method" "@path" "@query-params";name="foo");created=1700000000;keyid="app";alg="ed25519"
//! Signature: sig1=:base64-signature:
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::components::ComponentId;
use crate::error::{HttpSignatureError, Result};

pub const SIGNATURE_INPUT: &str = "signature-input";
pub const SIGNATURE: &str = "signature";

/// Label used by [`crate::sign_request`].
pub const DEFAULT_LABEL: &str = "sig1";

/// The covered components and metadata of one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParams {
    pub components: Vec<ComponentId>,
    pub created: Option<i64>,
    pub keyid: Option<String>,
    pub alg: Option<String>,
    /// The member value exactly as received; reused in the signature base.
    raw: Option<String>,
}

impl SignatureParams {
    pub fn new(components: Vec<ComponentId>) -> Self {
        Self {
            components,
            created: None,
            keyid: None,
            alg: None,
            raw: None,
        }
    }

    pub fn with_created(mut self, created: i64) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_keyid(mut self, keyid: impl Into<String>) -> Self {
        self.keyid = Some(keyid.into());
        self
    }

    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// The serialized inner list and parameters, the value of the
    /// `@signature-params` line.
    pub fn serialize(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let ids: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        let mut out = format!("({})", ids.join(" "));
        if let Some(created) = self.created {
            out.push_str(&format!(";created={created}"));
        }
        if let Some(keyid) = &self.keyid {
            out.push_str(&format!(";keyid=\"{keyid}\""));
        }
        if let Some(alg) = &self.alg {
            out.push_str(&format!(";alg=\"{alg}\""));
        }
        out
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(malformed(format!("expected {c:?} at offset {}", self.pos)))
        }
    }

    fn token(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || "-_.*".contains(c)) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(malformed(format!("expected a key at offset {start}")));
        }
        Ok(&self.src[start..self.pos])
    }

    fn quoted(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(malformed("unterminated string")),
                Some('"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => {
                    self.pos += 1;
                    let c = self.peek().ok_or_else(|| malformed("dangling escape"))?;
                    self.pos += c.len_utf8();
                    out.push(c);
                }
                Some(c) => {
                    self.pos += c.len_utf8();
                    out.push(c);
                }
            }
        }
    }

    /// `;key=value` pairs; values are quoted strings, integers or tokens.
    fn params(&mut self) -> Result<Vec<(String, ParamValue)>> {
        let mut out = Vec::new();
        while self.eat(';') {
            self.skip_ws();
            let key = self.token()?.to_string();
            self.expect('=')?;
            let value = match self.peek() {
                Some('"') => ParamValue::Text(self.quoted()?),
                Some(c) if c.is_ascii_digit() || c == '-' => {
                    let raw = self.token()?;
                    ParamValue::Integer(
                        raw.parse()
                            .map_err(|_| malformed(format!("{key} is not an integer")))?,
                    )
                }
                _ => ParamValue::Text(self.token()?.to_string()),
            };
            out.push((key, value));
        }
        Ok(out)
    }
}

enum ParamValue {
    Text(String),
    Integer(i64),
}

fn malformed(reason: impl Into<String>) -> HttpSignatureError {
    HttpSignatureError::MalformedSignatureInput(reason.into())
}

fn parse_member(cur: &mut Cursor<'_>) -> Result<SignatureParams> {
    let start = cur.pos;
    cur.expect('(')?;
    let mut components = Vec::new();
    loop {
        cur.skip_ws();
        if cur.eat(')') {
            break;
        }
        let name = cur.quoted()?;
        let mut name_param = None;
        for (key, value) in cur.params()? {
            match (key.as_str(), value) {
                ("name", ParamValue::Text(v)) => name_param = Some(v),
                (other, _) => {
                    return Err(malformed(format!("unsupported component parameter {other}")))
                }
            }
        }
        components.push(ComponentId::parse(&name, name_param)?);
    }

    let mut params = SignatureParams::new(components);
    for (key, value) in cur.params()? {
        match (key.as_str(), value) {
            ("created", ParamValue::Integer(v)) => params.created = Some(v),
            ("created", ParamValue::Text(_)) => return Err(malformed("created is not an integer")),
            ("keyid", ParamValue::Text(v)) => params.keyid = Some(v),
            ("alg", ParamValue::Text(v)) => params.alg = Some(v),
            // Other metadata is covered by the signature but not interpreted.
            _ => {}
        }
    }
    params.raw = Some(cur.src[start..cur.pos].to_string());
    Ok(params)
}

/// Parse every labelled member of a `Signature-Input` field, in order.
pub fn parse_signature_input(field: &str) -> Result<Vec<(String, SignatureParams)>> {
    let mut cur = Cursor::new(field.trim());
    let mut members = Vec::new();
    loop {
        cur.skip_ws();
        let label = cur.token()?.to_string();
        cur.expect('=')?;
        members.push((label, parse_member(&mut cur)?));
        cur.skip_ws();
        if cur.at_end() {
            break;
        }
        cur.expect(',')?;
    }
    Ok(members)
}

/// Find and decode the signature bytes for `label` in a `Signature` field.
pub fn parse_signature(field: &str, label: &str) -> Result<Vec<u8>> {
    for member in field.split(',') {
        let Some((name, value)) = member.trim().split_once('=') else {
            return Err(malformed("signature member without a value"));
        };
        if name.trim() != label {
            continue;
        }
        let encoded = value
            .trim()
            .strip_prefix(':')
            .and_then(|v| v.strip_suffix(':'))
            .ok_or_else(|| malformed("signature is not a byte sequence"))?;
        return STANDARD
            .decode(encoded)
            .map_err(|e| malformed(format!("signature is not base64: {e}")));
    }
    Err(malformed(format!("no signature labelled {label}")))
}

pub(crate) fn format_signature(label: &str, signature: &[u8]) -> String {
    format!("{label}=:{}:", STANDARD.encode(signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustmark_core::DerivedComponent;

    const INPUT: &str = r#"sig1=("@method" "@path" "content-type" "@query-params";name="foo");created=1700000000;keyid="app key";alg="ed25519""#;

    #[test]
    fn test_parse_signature_input() {
        let members = parse_signature_input(INPUT).unwrap();
        assert_eq!(members.len(), 1);
        let (label, params) = &members[0];
        assert_eq!(label, "sig1");
        assert_eq!(
            params.components,
            vec![
                ComponentId::Derived(DerivedComponent::Method),
                ComponentId::Derived(DerivedComponent::Path),
                ComponentId::Header("content-type".into()),
                ComponentId::QueryParam("foo".into()),
            ]
        );
        assert_eq!(params.created, Some(1700000000));
        assert_eq!(params.keyid.as_deref(), Some("app key"));
        assert_eq!(params.alg.as_deref(), Some("ed25519"));
        assert_eq!(params.serialize(), &INPUT["sig1=".len()..]);
    }

    #[test]
    fn test_built_params_serialize_like_received() {
        let built = SignatureParams::new(vec![
            DerivedComponent::Method.into(),
            DerivedComponent::Path.into(),
            ComponentId::header("Content-Type"),
            ComponentId::query_param("foo"),
        ])
        .with_created(1700000000)
        .with_keyid("app key")
        .with_alg("ed25519");
        assert_eq!(built.serialize(), &INPUT["sig1=".len()..]);
    }

    #[test]
    fn test_multiple_members() {
        let field = r#"a=("@method");created=1, b=("@path")"#;
        let members = parse_signature_input(field).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].0, "b");
        assert_eq!(members[1].1.serialize(), r#"("@path")"#);
    }

    #[test]
    fn test_malformed_inputs() {
        for bad in ["", "sig1", "sig1=(\"@method\"", "sig1=(@method)", "sig1=();created=soon"] {
            assert!(
                matches!(parse_signature_input(bad), Err(HttpSignatureError::MalformedSignatureInput(_))),
                "{bad}"
            );
        }
        assert!(matches!(
            parse_signature_input(r#"sig1=("@bogus")"#),
            Err(HttpSignatureError::InvalidDerivedComponent(_))
        ));
    }

    #[test]
    fn test_signature_field() {
        let field = format!("other=:AAAA:, {}", format_signature("sig1", b"\x01\x02\x03"));
        assert_eq!(parse_signature(&field, "sig1").unwrap(), vec![1, 2, 3]);
        assert!(parse_signature(&field, "sig2").is_err());
        assert!(parse_signature("sig1=notbytes", "sig1").is_err());
    }
}
