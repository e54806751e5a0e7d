//! Catalogue loading and the compiled endpoint model.
//!
//! [`Catalog::load`] turns a YAML document into an immutable name → endpoint
//! map, compiling URL/body templates into segment lists and enforcing every
//! cross-reference rule up front. After a successful load, invocation-time
//! code never re-checks placeholder/declaration consistency.

use crate::config::{AuthSpec, CatalogDocument, EndpointRecord, ParamRole, ParamType};
use crate::error::LoadError;
use crate::template::{Template, TemplateKind};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use url::Url;

/// HTTP methods the dispatcher will issue (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Parse a method token case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared parameter after load-time validation.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub role: ParamRole,
    pub ty: ParamType,
    pub required: bool,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub description: Option<String>,
}

/// A fully validated endpoint definition. Immutable once loaded.
///
/// Guarantees established by the loader:
/// - every template placeholder names a declared parameter;
/// - URL placeholders and path-role parameters are exactly the same set;
/// - path parameters are required;
/// - bounds appear only on integer parameters, with `minimum <= maximum`.
#[derive(Debug, Clone)]
pub struct EndpointDefinition {
    pub name: String,
    pub description: Option<String>,
    pub method: Method,
    pub url: Template,
    /// Declaration order is preserved; query assembly depends on it.
    pub params: IndexMap<String, ParamSpec>,
    pub body: Option<Template>,
    pub headers: IndexMap<String, String>,
    pub auth: Option<AuthSpec>,
}

/// The loaded catalogue: an immutable endpoint map plus catalogue-level
/// transport inputs (base URL, global headers).
///
/// Built once at startup; safe to read concurrently without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    version: Option<String>,
    base_url: String,
    global_headers: IndexMap<String, String>,
    endpoints: IndexMap<String, EndpointDefinition>,
}

impl Catalog {
    /// Parse and validate a catalogue document.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] naming the offending endpoint and rule. A
    /// single bad entry fails the whole load; there is no partial catalogue.
    pub fn load(yaml: &str) -> Result<Self, LoadError> {
        let doc: CatalogDocument = serde_yaml::from_str(yaml)?;
        Self::from_document(doc)
    }

    /// Load a catalogue from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or the document is
    /// invalid.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(&text)
    }

    /// Compile an already-parsed document.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] on the first rule violation.
    pub fn from_document(doc: CatalogDocument) -> Result<Self, LoadError> {
        let base = Url::parse(&doc.base_url).map_err(|e| LoadError::BaseUrl {
            base_url: doc.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(LoadError::BaseUrl {
                base_url: doc.base_url.clone(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        let mut endpoints: IndexMap<String, EndpointDefinition> = IndexMap::new();
        for record in doc.endpoints {
            let endpoint = compile_endpoint(record)?;
            let name = endpoint.name.clone();
            if endpoints.insert(name.clone(), endpoint).is_some() {
                return Err(LoadError::DuplicateEndpoint { endpoint: name });
            }
        }

        tracing::info!(
            catalogue = %doc.name,
            endpoints = endpoints.len(),
            "catalogue loaded"
        );

        Ok(Self {
            name: doc.name,
            version: doc.version,
            base_url: doc.base_url,
            global_headers: doc.global_headers,
            endpoints,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn global_headers(&self) -> &IndexMap<String, String> {
        &self.global_headers
    }

    /// Look up an endpoint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EndpointDefinition> {
        self.endpoints.get(name)
    }

    /// Iterate endpoints in declaration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDefinition> {
        self.endpoints.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn compile_endpoint(record: EndpointRecord) -> Result<EndpointDefinition, LoadError> {
    let EndpointRecord {
        name,
        description,
        method,
        url,
        params,
        body_template,
        headers,
        auth,
    } = record;

    let parsed_method = Method::parse(&method).ok_or_else(|| LoadError::InvalidMethod {
        endpoint: name.clone(),
        method: method.clone(),
    })?;

    let url_template = Template::parse(&url);
    let body = body_template.as_deref().map(Template::parse);

    let mut specs: IndexMap<String, ParamSpec> = IndexMap::with_capacity(params.len());
    for (param, p) in params {
        let required = p.required.unwrap_or(p.role == ParamRole::Path);
        if p.role == ParamRole::Path && !required {
            return Err(LoadError::OptionalPathParam {
                endpoint: name.clone(),
                param,
            });
        }
        if (p.minimum.is_some() || p.maximum.is_some()) && p.ty != ParamType::Integer {
            return Err(LoadError::BoundsOnNonInteger {
                endpoint: name.clone(),
                param,
            });
        }
        if let (Some(minimum), Some(maximum)) = (p.minimum, p.maximum)
            && minimum > maximum
        {
            return Err(LoadError::InvalidBounds {
                endpoint: name.clone(),
                param,
                minimum,
                maximum,
            });
        }
        specs.insert(
            param,
            ParamSpec {
                role: p.role,
                ty: p.ty,
                required,
                minimum: p.minimum,
                maximum: p.maximum,
                description: p.description,
            },
        );
    }

    // URL placeholders must be declared path parameters, and vice versa.
    let url_params: HashSet<&str> = url_template.param_names().collect();
    for param in &url_params {
        match specs.get(*param) {
            None => {
                return Err(LoadError::UndeclaredPlaceholder {
                    endpoint: name.clone(),
                    kind: TemplateKind::Url,
                    param: (*param).to_string(),
                });
            }
            Some(spec) if spec.role != ParamRole::Path => {
                return Err(LoadError::UrlPlaceholderRole {
                    endpoint: name.clone(),
                    param: (*param).to_string(),
                });
            }
            Some(_) => {}
        }
    }
    for (param, spec) in &specs {
        if spec.role == ParamRole::Path && !url_params.contains(param.as_str()) {
            return Err(LoadError::PathParamNotInUrl {
                endpoint: name.clone(),
                param: param.clone(),
            });
        }
    }

    // Body placeholders may reference any declared parameter.
    if let Some(body) = &body {
        for param in body.param_names() {
            if !specs.contains_key(param) {
                return Err(LoadError::UndeclaredPlaceholder {
                    endpoint: name.clone(),
                    kind: TemplateKind::Body,
                    param: param.to_string(),
                });
            }
        }
    }

    Ok(EndpointDefinition {
        name,
        description,
        method: parsed_method,
        url: url_template,
        params: specs,
        body,
        headers,
        auth,
    })
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Method};
    use crate::error::LoadError;
    use crate::template::TemplateKind;

    const VALID: &str = r#"
name: sample-api
version: "1.0.0"
base_url: http://localhost:8000
global_headers:
  Accept: application/json
endpoints:
  - name: get_user_by_id
    method: GET
    url: /users/{user_id}
    params:
      user_id:
        in: path
        type: string
  - name: create_user
    method: POST
    url: /users
    params:
      name:
        type: string
        required: true
      email:
        type: string
        required: true
      role:
        in: body
        type: string
    body_template: '{"name": "{name}", "email": "{email}", "role": "{role}"}'
  - name: search_data
    method: GET
    url: /api/search
    params:
      query:
        type: string
        required: true
      page:
        type: integer
        minimum: 1
"#;

    fn with_endpoint(endpoint_yaml: &str) -> Result<Catalog, LoadError> {
        Catalog::load(&format!(
            "name: t\nbase_url: http://localhost:1\nendpoints:\n{endpoint_yaml}"
        ))
    }

    #[test]
    fn load_valid_catalogue() {
        let catalog = Catalog::load(VALID).expect("valid catalogue");
        assert_eq!(catalog.name(), "sample-api");
        assert_eq!(catalog.version(), Some("1.0.0"));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.global_headers()["Accept"], "application/json");

        let get_user = catalog.get("get_user_by_id").expect("endpoint exists");
        assert_eq!(get_user.method, Method::Get);
        assert!(get_user.params["user_id"].required);

        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn load_preserves_endpoint_order() {
        let catalog = Catalog::load(VALID).expect("valid catalogue");
        let names: Vec<&str> = catalog.endpoints().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["get_user_by_id", "create_user", "search_data"]);
    }

    #[test]
    fn rejects_duplicate_endpoint_names() {
        let err = with_endpoint(
            r"
  - name: ping
    url: /ping
  - name: ping
    url: /ping2
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateEndpoint { endpoint } if endpoint == "ping"));
    }

    #[test]
    fn rejects_unknown_method() {
        let err = with_endpoint(
            r"
  - name: ping
    method: PATCH
    url: /ping
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidMethod { method, .. } if method == "PATCH"));
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        let catalog = with_endpoint(
            r"
  - name: ping
    method: delete
    url: /ping
",
        )
        .expect("valid catalogue");
        assert_eq!(catalog.get("ping").expect("exists").method, Method::Delete);
    }

    #[test]
    fn rejects_undeclared_url_placeholder() {
        let err = with_endpoint(
            r"
  - name: get_user
    url: /users/{user_id}
",
        )
        .unwrap_err();
        match err {
            LoadError::UndeclaredPlaceholder { kind, param, .. } => {
                assert_eq!(kind, TemplateKind::Url);
                assert_eq!(param, "user_id");
            }
            other => panic!("expected UndeclaredPlaceholder, got {other}"),
        }
    }

    #[test]
    fn rejects_url_placeholder_with_query_role() {
        let err = with_endpoint(
            r"
  - name: get_user
    url: /users/{user_id}
    params:
      user_id:
        in: query
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UrlPlaceholderRole { param, .. } if param == "user_id"));
    }

    #[test]
    fn rejects_path_param_missing_from_url() {
        let err = with_endpoint(
            r"
  - name: get_user
    url: /users
    params:
      user_id:
        in: path
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::PathParamNotInUrl { param, .. } if param == "user_id"));
    }

    #[test]
    fn rejects_optional_path_param() {
        let err = with_endpoint(
            r"
  - name: get_user
    url: /users/{user_id}
    params:
      user_id:
        in: path
        required: false
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::OptionalPathParam { param, .. } if param == "user_id"));
    }

    #[test]
    fn rejects_undeclared_body_placeholder() {
        let err = with_endpoint(
            r#"
  - name: create
    method: POST
    url: /items
    body_template: '{"label": "{label}"}'
"#,
        )
        .unwrap_err();
        match err {
            LoadError::UndeclaredPlaceholder { kind, param, .. } => {
                assert_eq!(kind, TemplateKind::Body);
                assert_eq!(param, "label");
            }
            other => panic!("expected UndeclaredPlaceholder, got {other}"),
        }
    }

    #[test]
    fn rejects_bounds_on_string_param() {
        let err = with_endpoint(
            r"
  - name: search
    url: /search
    params:
      q:
        type: string
        minimum: 1
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::BoundsOnNonInteger { param, .. } if param == "q"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = with_endpoint(
            r"
  - name: search
    url: /search
    params:
      page:
        type: integer
        minimum: 10
        maximum: 1
",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidBounds {
                minimum: 10,
                maximum: 1,
                ..
            }
        ));
    }

    #[test]
    fn unclosed_url_brace_surfaces_as_missing_path_param() {
        // `{user_id` never forms a placeholder, so the declared path param
        // has nowhere to land.
        let err = with_endpoint(
            r"
  - name: get_user
    url: /users/{user_id
    params:
      user_id:
        in: path
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::PathParamNotInUrl { param, .. } if param == "user_id"));
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = Catalog::load("name: t\nbase_url: 'not a url'\nendpoints: []").unwrap_err();
        assert!(matches!(err, LoadError::BaseUrl { .. }));

        let err = Catalog::load("name: t\nbase_url: 'ftp://host/x'\nendpoints: []").unwrap_err();
        assert!(matches!(err, LoadError::BaseUrl { reason, .. } if reason.contains("ftp")));
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, VALID).expect("write catalogue");

        let catalog = Catalog::load_file(&path).expect("valid catalogue");
        assert_eq!(catalog.len(), 3);

        let err = Catalog::load_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
