//! Error types for the courier core.

use crate::config::ParamType;
use crate::template::TemplateKind;
use std::fmt;
use thiserror::Error;

/// Errors produced while loading and validating a catalogue document.
///
/// Loading is all-or-nothing: the first rule violation fails the whole load,
/// and the process must not serve invocations against an invalid catalogue.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document is not valid YAML or does not match the expected shape.
    #[error("catalogue parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to read catalogue file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base_url '{base_url}': {reason}")]
    BaseUrl { base_url: String, reason: String },

    #[error("duplicate endpoint name '{endpoint}'")]
    DuplicateEndpoint { endpoint: String },

    #[error("endpoint '{endpoint}': invalid HTTP method '{method}'")]
    InvalidMethod { endpoint: String, method: String },

    #[error("endpoint '{endpoint}': {kind} template references undeclared parameter '{param}'")]
    UndeclaredPlaceholder {
        endpoint: String,
        kind: TemplateKind,
        param: String,
    },

    #[error("endpoint '{endpoint}': URL placeholder '{param}' must be declared 'in: path'")]
    UrlPlaceholderRole { endpoint: String, param: String },

    #[error("endpoint '{endpoint}': path parameter '{param}' does not appear in the URL template")]
    PathParamNotInUrl { endpoint: String, param: String },

    #[error("endpoint '{endpoint}': path parameter '{param}' cannot be optional")]
    OptionalPathParam { endpoint: String, param: String },

    #[error("endpoint '{endpoint}': parameter '{param}' declares bounds but is not integer-typed")]
    BoundsOnNonInteger { endpoint: String, param: String },

    #[error(
        "endpoint '{endpoint}': parameter '{param}' has minimum {minimum} > maximum {maximum}"
    )]
    InvalidBounds {
        endpoint: String,
        param: String,
        minimum: i64,
        maximum: i64,
    },
}

/// Aggregate argument validation failure: one entry per violated parameter.
///
/// Validation is exhaustive per call, so a caller sees every correction
/// needed in a single response.
#[derive(Debug, Error)]
#[error("invalid arguments for endpoint '{endpoint}': {}", list_violations(.violations))]
pub struct ValidationError {
    pub endpoint: String,
    pub violations: Vec<Violation>,
}

fn list_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single violated parameter constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: String },

    #[error("parameter '{name}' expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        got: String,
    },

    #[error("parameter '{name}' value {value} is out of range ({bound})")]
    OutOfRange {
        name: String,
        value: i64,
        bound: Bound,
    },
}

/// The violated side of an integer range. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Minimum(i64),
    Maximum(i64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Minimum(n) => write!(f, "minimum {n}"),
            Bound::Maximum(n) => write!(f, "maximum {n}"),
        }
    }
}

/// Credential resolution failure.
///
/// The built-in static resolver never fails; this exists for injected
/// resolvers that fetch material from somewhere that can be absent.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential resolution failed for {kind} auth: {reason}")]
    Unresolvable { kind: &'static str, reason: String },
}

/// Errors surfaced by a single invocation, before any network I/O.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown endpoint '{name}'")]
    UnknownEndpoint { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Transport-level failures (connect, timeout, invalid final URL).
///
/// Non-2xx responses are not errors; they come back as data.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL '{url}': {reason}")]
    Url { url: String, reason: String },

    #[error("http transport error: {0}")]
    Transport(String),
}

/// Error from an end-to-end call (dispatch + transport).
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
