//! Signature base construction.

use http::Request;

use crate::error::Result;
use crate::input::SignatureParams;

/// Build the signature base for `params` over `req`.
///
/// One `"<id>": <value>` line per covered component in declared order,
/// then the `"@signature-params"` line, joined by `\n`.
pub fn signature_base<B>(req: &Request<B>, params: &SignatureParams) -> Result<String> {
    let mut lines = Vec::with_capacity(params.components.len() + 1);
    for component in &params.components {
        lines.push(format!("{component}: {}", component.value(req)?));
    }
    lines.push(format!("\"@signature-params\": {}", params.serialize()));
    Ok(lines.join("\n"))
}
