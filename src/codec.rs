use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::encoding::{fast_marshal, fast_unmarshal, unmarshal_with_schema};
use crate::error::ResourceError;
use crate::options::{MarshalConfig, MarshalOption};
use crate::schema::static_tokens_schema_value;
use crate::traits::Resource;
use crate::types::{StaticTokens, StaticTokensV2};
use crate::validator::SchemaValidator;

/// Encodes and decodes static tokens. Implementations may support extended
/// versions of the resource.
pub trait StaticTokensMarshaler: Send + Sync {
    fn marshal(
        &self,
        tokens: &dyn StaticTokens,
        opts: &[MarshalOption],
    ) -> Result<Vec<u8>, ResourceError>;

    fn unmarshal(
        &self,
        bytes: &[u8],
        opts: &[MarshalOption],
    ) -> Result<Box<dyn StaticTokens>, ResourceError>;
}

static DEFAULT_VALIDATOR: OnceCell<SchemaValidator> = OnceCell::new();

fn default_validator() -> Result<&'static SchemaValidator, ResourceError> {
    DEFAULT_VALIDATOR.get_or_try_init(|| SchemaValidator::new(&static_tokens_schema_value("")?))
}

/// The built-in JSON marshaler for [`StaticTokensV2`].
#[derive(Debug, Clone, Default)]
pub struct DefaultStaticTokensMarshaler {
    extended: Option<Arc<SchemaValidator>>,
}

impl DefaultStaticTokensMarshaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A marshaler whose validating decode accepts the extra payload
    /// properties described by `extension` (see [`crate::schema::parse_extension`]).
    ///
    /// The extension only widens validation. [`StaticTokensV2`] has no place
    /// for the extra properties, so they are dropped on decode and a later
    /// encode does not write them back. Builds that need to keep them install
    /// their own marshaler and resource type.
    pub fn with_schema_extension(extension: &str) -> Result<Self, ResourceError> {
        if extension.trim().is_empty() {
            return Ok(Self::default());
        }
        let validator = SchemaValidator::new(&static_tokens_schema_value(extension)?)?;
        Ok(Self {
            extended: Some(Arc::new(validator)),
        })
    }

    fn validator(&self) -> Result<&SchemaValidator, ResourceError> {
        match &self.extended {
            Some(validator) => Ok(validator.as_ref()),
            None => default_validator(),
        }
    }

    /// Decode into the concrete resource type.
    pub fn unmarshal_v2(
        &self,
        bytes: &[u8],
        opts: &[MarshalOption],
    ) -> Result<StaticTokensV2, ResourceError> {
        if bytes.is_empty() {
            return Err(ResourceError::bad_parameter("missing resource data"));
        }

        let cfg = MarshalConfig::collect(opts)?;

        debug!(
            event = "Unmarshal",
            phase = "Decode",
            kind = "static_tokens",
            validate = !cfg.skip_validation,
            bytes = bytes.len()
        );

        let mut static_tokens: StaticTokensV2 = if cfg.skip_validation {
            fast_unmarshal(bytes)?
        } else {
            unmarshal_with_schema(self.validator()?, bytes)?
        };

        static_tokens
            .check_and_set_defaults()
            .map_err(|e| e.wrap("static tokens failed validation"))?;

        // Overrides are applied after defaulting so they always win.
        if cfg.id != 0 {
            static_tokens.set_resource_id(cfg.id);
        }
        if let Some(expires) = cfg.expires {
            static_tokens.set_expiry(Some(expires));
        }

        debug!(
            event = "Unmarshal",
            phase = "Done",
            name = static_tokens.name(),
            tokens = static_tokens.spec().static_tokens.len(),
            id = static_tokens.resource_id()
        );
        Ok(static_tokens)
    }
}

impl StaticTokensMarshaler for DefaultStaticTokensMarshaler {
    fn marshal(
        &self,
        tokens: &dyn StaticTokens,
        opts: &[MarshalOption],
    ) -> Result<Vec<u8>, ResourceError> {
        let Some(resource) = tokens.as_any().downcast_ref::<StaticTokensV2>() else {
            return Err(ResourceError::bad_parameter(format!(
                "unrecognized resource version {}",
                tokens.type_name()
            )));
        };

        let cfg = MarshalConfig::collect(opts)?;

        debug!(
            event = "Marshal",
            phase = "Encode",
            kind = resource.kind(),
            preserve_id = cfg.preserve_resource_id
        );

        if cfg.preserve_resource_id {
            return fast_marshal(resource);
        }
        // Encode a copy so the caller's resource is never touched.
        let mut copy = resource.clone();
        copy.set_resource_id(0);
        fast_marshal(&copy)
    }

    fn unmarshal(
        &self,
        bytes: &[u8],
        opts: &[MarshalOption],
    ) -> Result<Box<dyn StaticTokens>, ResourceError> {
        Ok(Box::new(self.unmarshal_v2(bytes, opts)?))
    }
}

#[cfg(test)]
mod tests;
