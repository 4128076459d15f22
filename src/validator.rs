//! Compiled JSON Schema validator for resource documents.

use serde_json::Value;

use crate::error::ResourceError;

/// Wraps a compiled `jsonschema` validator; compile once, validate many.
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile `schema`. Fails with `BadParameter` if it is not a valid schema.
    pub fn new(schema: &Value) -> Result<Self, ResourceError> {
        let validator = jsonschema::options()
            .build(schema)
            .map_err(|e| ResourceError::bad_parameter(format!("invalid schema: {e}")))?;
        Ok(Self { validator })
    }

    /// Validate a decoded document, reporting the first violation.
    pub fn validate(&self, value: &Value) -> Result<(), ResourceError> {
        self.validator
            .validate(value)
            .map_err(|e| ResourceError::bad_parameter(e.to_string()))
    }
}
