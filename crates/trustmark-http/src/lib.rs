//! # trustmark http
//!
//! Verification of HTTP message signatures for `pki-http` annotations.
//!
//! A signer declares the covered components in `Signature-Input` and
//! attaches the signature in `Signature`. [`RequestHandler`] rebuilds the
//! signature base from the inbound request and verifies it with the key
//! from configuration.
//!
//! ## Derived components
//!
//! | id               | value                                        |
//! |------------------|----------------------------------------------|
//! | `@method`        | request method, upper case                   |
//! | `@target-uri`    | `scheme://authority/path?query`              |
//! | `@authority`     | URI authority or `Host`, lower case          |
//! | `@scheme`        | URI scheme, `http` when relative             |
//! | `@path`          | URI path, `/` when empty                     |
//! | `@query`         | `?` followed by the raw query                |
//! | `@query-params`  | decoded value of the `name` parameter        |
//!
//! Any other covered id names a header field.

pub mod base;
pub mod components;
pub mod error;
pub mod handler;
pub mod input;

pub use base::signature_base;
pub use components::ComponentId;
pub use error::{HttpSignatureError, Result};
pub use handler::{sign_request, RequestHandler};
pub use input::{
    parse_signature, parse_signature_input, SignatureParams, DEFAULT_LABEL, SIGNATURE,
    SIGNATURE_INPUT,
};
