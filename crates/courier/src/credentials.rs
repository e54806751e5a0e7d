//! Credential resolution.
//!
//! Catalogue-embedded secrets are a prototype convenience. All header
//! construction goes through [`CredentialResolver`] so a deployment can hand
//! the dispatcher a resolver backed by an env var store or a vault without
//! the request builder ever seeing where material comes from.

use crate::config::AuthSpec;
use crate::error::CredentialError;
use base64::Engine as _;

/// Turns an endpoint's auth requirement into one request header.
pub trait CredentialResolver: Send + Sync {
    /// Resolve an auth requirement into a `(header name, header value)` pair.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the backing store cannot produce
    /// material for this requirement.
    fn resolve(&self, auth: &AuthSpec) -> Result<(String, String), CredentialError>;
}

/// Default resolver over material embedded in the catalogue document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCredentials;

impl CredentialResolver for StaticCredentials {
    fn resolve(&self, auth: &AuthSpec) -> Result<(String, String), CredentialError> {
        Ok(match auth {
            AuthSpec::Bearer { token } => {
                ("Authorization".to_string(), format!("Bearer {token}"))
            }
            AuthSpec::ApiKey { header, key } => (header.clone(), key.clone()),
            AuthSpec::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                ("Authorization".to_string(), format!("Basic {credentials}"))
            }
        })
    }
}
