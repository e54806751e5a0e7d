//! Argument validation and type coercion.

use crate::catalog::EndpointDefinition;
use crate::config::ParamType;
use crate::error::{Bound, ValidationError, Violation};
use serde_json::Value;
use std::collections::BTreeMap;

/// Caller-supplied arguments for one invocation: parameter name → raw value.
pub type CallArguments = serde_json::Map<String, Value>;

/// A validated, coerced argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl ArgValue {
    /// Canonical string form used for substitution into URLs and bodies.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            ArgValue::String(s) => s.clone(),
            ArgValue::Integer(n) => n.to_string(),
            ArgValue::Bool(b) => b.to_string(),
        }
    }
}

/// Arguments after validation. Keys are declared parameter names only;
/// every value satisfies its [`crate::catalog::ParamSpec`].
pub type NormalizedArguments = BTreeMap<String, ArgValue>;

/// Check a caller-supplied argument object against an endpoint's declared
/// parameters.
///
/// Violations are collected across every parameter and returned together, so
/// one response shows the caller everything that needs correcting. Argument
/// names with no declaration are ignored and never forwarded.
///
/// # Errors
///
/// Returns a [`ValidationError`] carrying one [`Violation`] per failed
/// parameter.
pub fn validate(
    endpoint: &EndpointDefinition,
    args: &CallArguments,
) -> Result<NormalizedArguments, ValidationError> {
    let mut normalized = NormalizedArguments::new();
    let mut violations = Vec::new();

    for (name, spec) in &endpoint.params {
        let Some(raw) = args.get(name) else {
            if spec.required {
                violations.push(Violation::MissingParameter { name: name.clone() });
            }
            continue;
        };

        match coerce(raw, spec.ty) {
            Ok(value) => {
                if let ArgValue::Integer(n) = value {
                    if let Some(min) = spec.minimum
                        && n < min
                    {
                        violations.push(Violation::OutOfRange {
                            name: name.clone(),
                            value: n,
                            bound: Bound::Minimum(min),
                        });
                        continue;
                    }
                    if let Some(max) = spec.maximum
                        && n > max
                    {
                        violations.push(Violation::OutOfRange {
                            name: name.clone(),
                            value: n,
                            bound: Bound::Maximum(max),
                        });
                        continue;
                    }
                }
                normalized.insert(name.clone(), value);
            }
            Err(got) => violations.push(Violation::TypeMismatch {
                name: name.clone(),
                expected: spec.ty,
                got,
            }),
        }
    }

    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationError {
            endpoint: endpoint.name.clone(),
            violations,
        })
    }
}

fn coerce(raw: &Value, ty: ParamType) -> Result<ArgValue, String> {
    match ty {
        // Scalars are accepted in their canonical string form; callers
        // routinely pass `{"user_id": 2}` for a string-typed path parameter.
        ParamType::String => match raw {
            Value::String(s) => Ok(ArgValue::String(s.clone())),
            Value::Number(n) => Ok(ArgValue::String(n.to_string())),
            Value::Bool(b) => Ok(ArgValue::String(b.to_string())),
            other => Err(json_kind(other).to_string()),
        },
        ParamType::Integer => match raw {
            Value::Number(n) => n
                .as_i64()
                .map(ArgValue::Integer)
                .ok_or_else(|| format!("non-integer number {n}")),
            Value::String(s) => s
                .parse::<i64>()
                .map(ArgValue::Integer)
                .map_err(|_| format!("string \"{s}\"")),
            other => Err(json_kind(other).to_string()),
        },
        ParamType::Boolean => match raw {
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::String(s) => match s.as_str() {
                "true" => Ok(ArgValue::Bool(true)),
                "false" => Ok(ArgValue::Bool(false)),
                _ => Err(format!("string \"{s}\"")),
            },
            other => Err(json_kind(other).to_string()),
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
