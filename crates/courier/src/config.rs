//! Catalogue document model.
//!
//! These types mirror the YAML catalogue as written on disk. [`crate::catalog`]
//! compiles them into the immutable runtime model, rejecting anything
//! internally inconsistent; nothing here is validated beyond shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level catalogue document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogDocument {
    /// Catalogue display name.
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    /// Base URL that relative endpoint URLs resolve against at transport
    /// time.
    pub base_url: String,

    /// Headers applied to every request; endpoint headers win on conflict.
    #[serde(default)]
    pub global_headers: IndexMap<String, String>,

    pub endpoints: Vec<EndpointRecord>,
}

/// One endpoint as declared in the catalogue.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointRecord {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_method")]
    pub method: String,

    /// URL template with zero or more `{param}` placeholders.
    pub url: String,

    /// Declared parameters, in declaration order. Order matters: query
    /// entries are appended to the request in this order.
    #[serde(default)]
    pub params: IndexMap<String, ParamRecord>,

    /// Optional body template with `{param}` placeholders.
    #[serde(default)]
    pub body_template: Option<String>,

    /// Static headers attached to every request for this endpoint.
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    #[serde(default)]
    pub auth: Option<AuthSpec>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// One parameter declaration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParamRecord {
    /// Routing role: where the value ends up in the request.
    #[serde(rename = "in", default)]
    pub role: ParamRole,

    #[serde(rename = "type", default)]
    pub ty: ParamType,

    /// Defaults to true for path parameters, false otherwise.
    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,

    /// Inclusive lower bound; integer parameters only.
    #[serde(default)]
    pub minimum: Option<i64>,

    /// Inclusive upper bound; integer parameters only.
    #[serde(default)]
    pub maximum: Option<i64>,
}

/// Where a parameter's value is routed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamRole {
    /// Substituted into the URL template; always required.
    Path,
    /// Appended to the query string when present.
    #[default]
    Query,
    /// Only available to the body template.
    Body,
}

/// Declared value type of a parameter (closed set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Boolean,
}

impl ParamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication requirement attached to an endpoint.
///
/// Material here lives in the catalogue document (prototype convenience).
/// Turning it into a header goes through
/// [`crate::credentials::CredentialResolver`], so deployments that keep
/// secrets elsewhere swap the resolver, not the builder. Auth material is
/// never taken from call arguments.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthSpec {
    /// `Authorization: Bearer <token>`.
    Bearer { token: String },

    /// `<header>: <key>`.
    ApiKey {
        #[serde(default = "default_api_key_header")]
        header: String,
        key: String,
    },

    /// `Authorization: Basic <base64(username:password)>`.
    Basic { username: String, password: String },
}

fn default_api_key_header() -> String {
    "X-Api-Key".to_string()
}

#[cfg(test)]
mod tests {
    use super::{AuthSpec, EndpointRecord, ParamRole, ParamType};

    #[test]
    fn endpoint_record_minimal_defaults() {
        let record: EndpointRecord = serde_yaml::from_str(
            r"
name: health
url: /health
",
        )
        .expect("valid record");
        assert_eq!(record.method, "GET");
        assert!(record.params.is_empty());
        assert!(record.body_template.is_none());
        assert!(record.auth.is_none());
    }

    #[test]
    fn param_record_parses_role_and_type() {
        let record: EndpointRecord = serde_yaml::from_str(
            r"
name: search
url: /search
params:
  q:
    type: string
    required: true
  page:
    in: query
    type: integer
    minimum: 1
  user_id:
    in: path
    type: string
",
        )
        .expect("valid record");
        assert_eq!(record.params["q"].role, ParamRole::Query);
        assert_eq!(record.params["page"].ty, ParamType::Integer);
        assert_eq!(record.params["page"].minimum, Some(1));
        assert_eq!(record.params["user_id"].role, ParamRole::Path);
    }

    #[test]
    fn auth_spec_parses_tagged_variants() {
        let bearer: AuthSpec = serde_yaml::from_str("{type: bearer, token: t-1}").expect("bearer");
        assert!(matches!(bearer, AuthSpec::Bearer { token } if token == "t-1"));

        let api_key: AuthSpec = serde_yaml::from_str("{type: api_key, key: k-1}").expect("api_key");
        match api_key {
            AuthSpec::ApiKey { header, key } => {
                assert_eq!(header, "X-Api-Key");
                assert_eq!(key, "k-1");
            }
            other => panic!("expected api_key, got {other:?}"),
        }

        let basic: AuthSpec =
            serde_yaml::from_str("{type: basic, username: u, password: p}").expect("basic");
        assert!(matches!(basic, AuthSpec::Basic { .. }));
    }

    #[test]
    fn params_preserve_declaration_order() {
        let record: EndpointRecord = serde_yaml::from_str(
            r"
name: search
url: /search
params:
  zebra: {}
  alpha: {}
  middle: {}
",
        )
        .expect("valid record");
        let names: Vec<&str> = record.params.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }
}
