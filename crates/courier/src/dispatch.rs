//! Invocation orchestration.

use crate::catalog::Catalog;
use crate::credentials::{CredentialResolver, StaticCredentials};
use crate::error::DispatchError;
use crate::request::{self, RequestDescriptor};
use crate::validate::{self, CallArguments};
use std::sync::Arc;

/// Per-call orchestrator: endpoint lookup → argument validation → request
/// building.
///
/// Holds only the immutable catalogue and a credential resolver; each
/// invocation is a pure function of (catalogue, name, arguments), so a
/// `Dispatcher` is safe to share and call concurrently. Catalogue
/// replacement is "build a new `Dispatcher`", an atomic swap for whoever
/// holds it.
pub struct Dispatcher {
    catalog: Catalog,
    resolver: Arc<dyn CredentialResolver>,
}

impl Dispatcher {
    /// Dispatcher over catalogue-embedded credentials.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_resolver(catalog, Arc::new(StaticCredentials))
    }

    /// Dispatcher with an injected credential resolver (secrets kept outside
    /// the catalogue document).
    #[must_use]
    pub fn with_resolver(catalog: Catalog, resolver: Arc<dyn CredentialResolver>) -> Self {
        Self { catalog, resolver }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Produce a request descriptor for one invocation.
    ///
    /// No network I/O happens here; the descriptor is handed to a transport
    /// collaborator. Either a complete, valid descriptor is produced or none
    /// is.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownEndpoint`] if `name` is not in the catalogue.
    /// - [`DispatchError::Validation`] carrying every violated parameter; no
    ///   request is built.
    /// - [`DispatchError::Credential`] if the resolver cannot produce the
    ///   endpoint's auth header.
    pub fn invoke(
        &self,
        name: &str,
        args: &CallArguments,
    ) -> Result<RequestDescriptor, DispatchError> {
        let endpoint = self
            .catalog
            .get(name)
            .ok_or_else(|| DispatchError::UnknownEndpoint {
                name: name.to_string(),
            })?;

        let normalized = validate::validate(endpoint, args)?;
        let descriptor = request::build(endpoint, &normalized, self.resolver.as_ref())?;

        tracing::debug!(
            endpoint = %endpoint.name,
            method = %descriptor.method,
            url = %descriptor.url,
            "request built"
        );

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::Dispatcher;
    use crate::catalog::{Catalog, Method};
    use crate::error::{DispatchError, Violation};
    use crate::validate::CallArguments;
    use serde_json::{Value, json};

    const CATALOG: &str = r"
name: t
base_url: http://localhost:8000
endpoints:
  - name: get_user_by_id
    method: GET
    url: /users/{user_id}
    params:
      user_id:
        in: path
        type: string
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
";

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Catalog::load(CATALOG).expect("valid catalogue"))
    }

    fn args(value: Value) -> CallArguments {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn invoke_builds_descriptor() {
        let descriptor = dispatcher()
            .invoke("get_user_by_id", &args(json!({"user_id": "2"})))
            .expect("dispatches");
        assert_eq!(descriptor.method, Method::Get);
        assert_eq!(descriptor.url, "/users/2");
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let err = dispatcher()
            .invoke("does_not_exist", &args(json!({})))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::UnknownEndpoint { name } if name == "does_not_exist"
        ));
    }

    #[test]
    fn validation_failure_short_circuits() {
        let err = dispatcher()
            .invoke("search_data", &args(json!({"query": "x", "page": 0})))
            .unwrap_err();
        let DispatchError::Validation(validation) = err else {
            panic!("expected validation error");
        };
        assert_eq!(validation.violations.len(), 1);
        assert!(matches!(
            &validation.violations[0],
            Violation::OutOfRange { name, value: 0, .. } if name == "page"
        ));
    }
}
