//! Request descriptor construction.

use crate::catalog::{EndpointDefinition, Method};
use crate::config::ParamRole;
use crate::credentials::CredentialResolver;
use crate::error::CredentialError;
use crate::validate::{ArgValue, NormalizedArguments};
use serde::Serialize;

/// A fully-resolved request, ready for a transport to execute.
///
/// `url` is the endpoint's URL with placeholders substituted and the query
/// string attached; resolving it against the catalogue `base_url` is the
/// transport's job. Ownership transfers to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Build a descriptor from an endpoint and validated arguments.
///
/// Substitution itself cannot fail: the loader guarantees every placeholder
/// has a declaration and the validator guarantees every required value is
/// present. Only credential resolution is fallible.
///
/// # Errors
///
/// Returns a [`CredentialError`] if the resolver cannot produce the
/// endpoint's auth header.
pub fn build(
    endpoint: &EndpointDefinition,
    args: &NormalizedArguments,
    resolver: &dyn CredentialResolver,
) -> Result<RequestDescriptor, CredentialError> {
    // An absent path parameter here would be a loader/validator bug, never a
    // user error.
    debug_assert!(
        endpoint.url.param_names().all(|name| args.contains_key(name)),
        "validated arguments must cover every path parameter"
    );

    let mut url = endpoint
        .url
        .render(|name| args.get(name).map(|v| percent_encode(&v.render())));

    // Query entries in declaration order; absent optionals are omitted
    // entirely (no empty `name=` pairs).
    let mut query = String::new();
    for (name, spec) in &endpoint.params {
        if spec.role != ParamRole::Query {
            continue;
        }
        let Some(value) = args.get(name) else {
            continue;
        };
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&percent_encode(name));
        query.push('=');
        query.push_str(&percent_encode(&value.render()));
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    // Absent optional parameters render as the empty string; templates are
    // expected to tolerate empty fields.
    let body = endpoint
        .body
        .as_ref()
        .map(|template| template.render(|name| args.get(name).map(ArgValue::render)));

    let mut headers: Vec<(String, String)> = endpoint
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if let Some(auth) = &endpoint.auth {
        headers.push(resolver.resolve(auth)?);
    }

    Ok(RequestDescriptor {
        method: endpoint.method,
        url,
        headers,
        body,
    })
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode everything outside the RFC 3986 unreserved set.
///
/// NOTE: this also encodes '/', '&' and '=', so a substituted value can
/// neither splice path segments nor break the query-string joining.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
