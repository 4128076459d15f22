use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResourceError;
use crate::validator::SchemaValidator;

/// Encode `value` as JSON.
pub fn fast_marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ResourceError> {
    serde_json::to_vec(value).map_err(|e| ResourceError::Encoding(e.to_string()))
}

/// Decode JSON without schema validation. Unknown fields are ignored.
pub fn fast_unmarshal<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ResourceError> {
    serde_json::from_slice(bytes).map_err(|e| ResourceError::bad_parameter(e.to_string()))
}

/// Decode JSON after validating the document against `validator`.
pub fn unmarshal_with_schema<T: DeserializeOwned>(
    validator: &SchemaValidator,
    bytes: &[u8],
) -> Result<T, ResourceError> {
    let document: Value = fast_unmarshal(bytes)?;
    validator.validate(&document)?;
    serde_json::from_value(document).map_err(|e| ResourceError::bad_parameter(e.to_string()))
}
