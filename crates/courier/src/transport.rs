//! Transport collaborators: executing a built descriptor.
//!
//! The core never performs network I/O; a [`Transport`] consumes the
//! [`RequestDescriptor`] the dispatcher produced. Retry, backoff and
//! cancellation policy all live on this side of the boundary.

use crate::catalog::{Catalog, Method};
use crate::dispatch::Dispatcher;
use crate::error::{CallError, TransportError};
use crate::request::RequestDescriptor;
use crate::validate::CallArguments;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Raw response handed back to the dispatcher's caller.
///
/// No interpretation: a non-2xx status is data, not an error.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes request descriptors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on transport-level failures only
    /// (unresolvable URL, connect error, timeout).
    async fn send(&self, descriptor: RequestDescriptor) -> Result<WireResponse, TransportError>;
}

/// reqwest-backed transport bound to one catalogue's base URL and global
/// headers.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    global_headers: Vec<(String, String)>,
    timeout: Duration,
}

impl HttpTransport {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            global_headers: Vec::new(),
            timeout,
        }
    }

    /// Transport configured from a loaded catalogue (base URL plus global
    /// headers).
    #[must_use]
    pub fn for_catalog(catalog: &Catalog, timeout: Duration) -> Self {
        let mut transport = Self::new(catalog.base_url(), timeout);
        transport.global_headers = catalog
            .global_headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        transport
    }

    /// Absolute URLs pass through untouched; everything else joins the
    /// catalogue base URL.
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{}", self.base_url.trim_end_matches('/'), url)
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), url)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<WireResponse, TransportError> {
        let url = self.resolve_url(&descriptor.url);
        let url = Url::parse(&url).map_err(|e| TransportError::Url {
            url,
            reason: e.to_string(),
        })?;

        let mut request = self
            .client
            .request(as_reqwest_method(descriptor.method), url)
            .timeout(self.timeout);

        // Global headers apply only where the endpoint didn't set the same
        // name; endpoint headers win on conflict.
        for (key, value) in &self.global_headers {
            let overridden = descriptor
                .headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case(key));
            if !overridden {
                request = request.header(key.as_str(), value.as_str());
            }
        }
        for (key, value) in &descriptor.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = descriptor.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|value| (k.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// Strip credentials, query and fragment from any URL a reqwest error
/// message embeds.
fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

fn as_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Dispatcher and transport wired together for end-to-end calls.
pub struct Courier<T = HttpTransport> {
    dispatcher: Dispatcher,
    transport: T,
}

impl Courier<HttpTransport> {
    /// Wire a dispatcher to an [`HttpTransport`] derived from its catalogue.
    #[must_use]
    pub fn over_http(dispatcher: Dispatcher, timeout: Duration) -> Self {
        let transport = HttpTransport::for_catalog(dispatcher.catalog(), timeout);
        Self::new(dispatcher, transport)
    }
}

impl<T: Transport> Courier<T> {
    #[must_use]
    pub fn new(dispatcher: Dispatcher, transport: T) -> Self {
        Self {
            dispatcher,
            transport,
        }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build and execute one invocation.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] wrapping either the dispatch failure (no
    /// request was sent) or the transport failure.
    pub async fn call(&self, name: &str, args: &CallArguments) -> Result<WireResponse, CallError> {
        let descriptor = self.dispatcher.invoke(name, args)?;
        Ok(self.transport.send(descriptor).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpTransport;
    use std::time::Duration;

    #[test]
    fn resolve_url_joins_relative_paths() {
        let transport = HttpTransport::new("http://localhost:8000/", Duration::from_secs(1));
        assert_eq!(
            transport.resolve_url("/users/2"),
            "http://localhost:8000/users/2"
        );
        assert_eq!(
            transport.resolve_url("users/2"),
            "http://localhost:8000/users/2"
        );
    }

    #[test]
    fn resolve_url_passes_absolute_urls_through() {
        let transport = HttpTransport::new("http://localhost:8000", Duration::from_secs(1));
        assert_eq!(
            transport.resolve_url("https://api.example.com/v1/x"),
            "https://api.example.com/v1/x"
        );
    }
}
