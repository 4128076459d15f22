//! Validation schema for resources.
//!
//! A full schema is the payload (`spec`) schema of one resource type,
//! optionally extended with extra properties, embedded in the envelope
//! schema shared by every resource together with the metadata schema and the
//! shared type definitions.

use serde_json::{Map, Value, json};

use crate::constants::{DEFAULT_NAMESPACE, V2};
use crate::error::ResourceError;
use crate::types::LABEL_KEY_PATTERN;

fn metadata_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "default": {},
        "required": ["name"],
        "properties": {
            "name": {"type": "string"},
            "namespace": {"type": "string", "default": DEFAULT_NAMESPACE},
            "description": {"type": "string"},
            "expires": {"type": "string"},
            "id": {"type": "integer"},
            "labels": {
                "type": "object",
                "additionalProperties": false,
                "patternProperties": {
                    LABEL_KEY_PATTERN: {"type": "string"}
                }
            }
        }
    })
}

fn default_definitions() -> Value {
    json!({
        "trait": {
            "type": "object",
            "patternProperties": {
                "^.*$": {
                    "anyOf": [
                        {"type": "string"},
                        {"type": "array", "items": {"type": "string"}}
                    ]
                }
            }
        }
    })
}

fn static_tokens_spec_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "static_tokens": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "expires": {"type": "string"},
                        "roles": {"type": "array", "items": {"type": "string"}},
                        "token": {"type": "string"}
                    }
                }
            }
        }
    })
}

/// Parse an extension fragment: a JSON property list such as
/// `"foo": {"type": "string"}, "bar": {"type": "integer"}`.
///
/// An empty or blank fragment yields no properties.
pub fn parse_extension(fragment: &str) -> Result<Map<String, Value>, ResourceError> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&format!("{{{fragment}}}")).map_err(|e| {
        ResourceError::bad_parameter(format!("malformed schema extension: {e}"))
    })
}

/// Merge `extension` into the `properties` of a payload schema.
///
/// Every extension property must be a schema object and must not replace a
/// property of the base schema.
pub fn extend_schema(
    mut spec_schema: Value,
    extension: Map<String, Value>,
) -> Result<Value, ResourceError> {
    let properties = spec_schema
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| ResourceError::bad_parameter("payload schema has no properties"))?;

    for (name, schema) in extension {
        if !schema.is_object() {
            return Err(ResourceError::bad_parameter(format!(
                "schema extension {name:?} is not a schema object"
            )));
        }
        if properties.contains_key(&name) {
            return Err(ResourceError::bad_parameter(format!(
                "schema extension {name:?} collides with an existing property"
            )));
        }
        properties.insert(name, schema);
    }
    Ok(spec_schema)
}

/// Embed a payload schema in the envelope schema shared by all resources.
pub fn resource_schema(spec_schema: Value) -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["kind", "spec", "metadata", "version"],
        "properties": {
            "kind": {"type": "string"},
            "sub_kind": {"type": "string"},
            "version": {"type": "string", "default": V2},
            "metadata": metadata_schema(),
            "spec": spec_schema
        },
        "definitions": default_definitions()
    })
}

/// The full static tokens schema with `extension` injected into its payload.
pub fn static_tokens_schema_value(extension: &str) -> Result<Value, ResourceError> {
    let spec = extend_schema(static_tokens_spec_schema(), parse_extension(extension)?)?;
    Ok(resource_schema(spec))
}

/// The full static tokens schema document, rendered as JSON text.
pub fn static_tokens_schema(extension: &str) -> Result<String, ResourceError> {
    let schema = static_tokens_schema_value(extension)?;
    serde_json::to_string(&schema).map_err(|e| ResourceError::Encoding(e.to_string()))
}
