//! JSON Schema descriptions of endpoint inputs.
//!
//! Tool-calling clients discover what an endpoint accepts through an object
//! schema (`properties` + `required`), the same shape they use for any other
//! tool. The CLI `describe` command prints these.

use crate::catalog::EndpointDefinition;
use serde_json::{Value, json};

/// Describe an endpoint's declared parameters as a JSON Schema object.
#[must_use]
pub fn input_schema(endpoint: &EndpointDefinition) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required: Vec<String> = Vec::new();

    for (name, spec) in &endpoint.params {
        let mut prop = serde_json::Map::new();
        prop.insert("type".to_string(), json!(spec.ty.as_str()));
        if let Some(description) = &spec.description {
            prop.insert("description".to_string(), json!(description));
        }
        if let Some(minimum) = spec.minimum {
            prop.insert("minimum".to_string(), json!(minimum));
        }
        if let Some(maximum) = spec.maximum {
            prop.insert("maximum".to_string(), json!(maximum));
        }
        properties.insert(name.clone(), Value::Object(prop));

        if spec.required {
            required.push(name.clone());
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}
