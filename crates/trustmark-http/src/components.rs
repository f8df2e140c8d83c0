//! Covered components and their values in a request.

use std::fmt;

use http::Request;
use trustmark_core::DerivedComponent;

use crate::error::{HttpSignatureError, Result};

/// One entry of the covered-component list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentId {
    /// A derived component other than `@query-params`.
    Derived(DerivedComponent),
    /// `@query-params;name="..."`.
    QueryParam(String),
    /// An ordinary header field, lowercased.
    Header(String),
}

impl ComponentId {
    pub fn header(name: &str) -> Self {
        ComponentId::Header(name.to_ascii_lowercase())
    }

    pub fn query_param(name: impl Into<String>) -> Self {
        ComponentId::QueryParam(name.into())
    }

    /// Build from a component name and its optional `name` parameter.
    pub(crate) fn parse(name: &str, param: Option<String>) -> Result<Self> {
        if !name.starts_with('@') {
            return Ok(ComponentId::header(name));
        }
        let derived: DerivedComponent = name
            .parse()
            .map_err(HttpSignatureError::InvalidDerivedComponent)?;
        match (derived, param) {
            (DerivedComponent::QueryParams, Some(p)) => Ok(ComponentId::QueryParam(p)),
            (DerivedComponent::QueryParams, None) => Err(HttpSignatureError::MalformedSignatureInput(
                "@query-params requires a name parameter".into(),
            )),
            (d, None) => Ok(ComponentId::Derived(d)),
            (d, Some(_)) => Err(HttpSignatureError::MalformedSignatureInput(format!(
                "{d} takes no name parameter"
            ))),
        }
    }

    /// Extract this component's value from `req`.
    pub fn value<B>(&self, req: &Request<B>) -> Result<String> {
        match self {
            ComponentId::Derived(d) => derived_value(*d, req),
            ComponentId::QueryParam(name) => {
                let query = req.uri().query().unwrap_or_default();
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(k, _)| k == name.as_str())
                    .map(|(_, v)| v.into_owned())
                    .ok_or_else(|| HttpSignatureError::MissingComponent(self.to_string()))
            }
            ComponentId::Header(name) => header_value(req, name),
        }
    }
}

/// The serialized component identifier, as it appears in the signature base.
impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Derived(d) => write!(f, "\"{d}\""),
            ComponentId::QueryParam(name) => {
                write!(f, "\"{}\";name=\"{name}\"", DerivedComponent::QueryParams)
            }
            ComponentId::Header(name) => write!(f, "\"{name}\""),
        }
    }
}

impl From<DerivedComponent> for ComponentId {
    fn from(d: DerivedComponent) -> Self {
        ComponentId::Derived(d)
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Result<String> {
    let mut values = Vec::new();
    for v in req.headers().get_all(name) {
        let text = v
            .to_str()
            .map_err(|_| HttpSignatureError::InvalidHeader(name.to_string()))?;
        values.push(text.trim().to_string());
    }
    if values.is_empty() {
        return Err(HttpSignatureError::MissingComponent(name.to_string()));
    }
    Ok(values.join(", "))
}

fn authority<B>(req: &Request<B>) -> Result<String> {
    if let Some(authority) = req.uri().authority() {
        return Ok(authority.as_str().to_ascii_lowercase());
    }
    match req.headers().get(http::header::HOST) {
        Some(host) => host
            .to_str()
            .map(|h| h.trim().to_ascii_lowercase())
            .map_err(|_| HttpSignatureError::InvalidHeader("host".into())),
        None => Err(HttpSignatureError::MissingComponent(
            DerivedComponent::Authority.to_string(),
        )),
    }
}

fn derived_value<B>(component: DerivedComponent, req: &Request<B>) -> Result<String> {
    let uri = req.uri();
    let scheme = || uri.scheme_str().unwrap_or("http").to_ascii_lowercase();
    let path = || match uri.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };
    let query = || format!("?{}", uri.query().unwrap_or_default());

    Ok(match component {
        DerivedComponent::Method => req.method().as_str().to_ascii_uppercase(),
        DerivedComponent::Scheme => scheme(),
        DerivedComponent::Authority => authority(req)?,
        DerivedComponent::Path => path(),
        DerivedComponent::Query => query(),
        DerivedComponent::TargetUri => {
            let mut target = format!("{}://{}{}", scheme(), authority(req)?, path());
            if let Some(q) = uri.query() {
                target.push('?');
                target.push_str(q);
            }
            target
        }
        DerivedComponent::QueryParams => {
            return Err(HttpSignatureError::MalformedSignatureInput(
                "@query-params requires a name parameter".into(),
            ))
        }
    })
}
