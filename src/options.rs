//! Per-call marshaling options.

use chrono::{DateTime, Utc};

use crate::error::ResourceError;

/// A single marshaling option. Pass a slice of these to a marshaler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalOption {
    /// Decode without schema validation, using the fast path.
    SkipValidation,
    /// Keep the resource ID in encoded output.
    PreserveResourceId,
    /// Override the resource ID after decoding. Zero leaves it untouched.
    WithResourceId(i64),
    /// Override the expiry after decoding.
    WithExpires(DateTime<Utc>),
}

/// Options collected for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarshalConfig {
    pub skip_validation: bool,
    pub preserve_resource_id: bool,
    pub id: i64,
    pub expires: Option<DateTime<Utc>>,
}

impl MarshalConfig {
    /// Fold `opts` into a config. Later options win over earlier ones.
    pub fn collect(opts: &[MarshalOption]) -> Result<Self, ResourceError> {
        let mut cfg = MarshalConfig::default();
        for opt in opts {
            match opt {
                MarshalOption::SkipValidation => cfg.skip_validation = true,
                MarshalOption::PreserveResourceId => cfg.preserve_resource_id = true,
                MarshalOption::WithResourceId(id) if *id < 0 => {
                    return Err(ResourceError::bad_parameter(format!(
                        "resource ID must not be negative, got {id}"
                    )));
                }
                MarshalOption::WithResourceId(id) => cfg.id = *id,
                MarshalOption::WithExpires(expires) => cfg.expires = Some(*expires),
            }
        }
        Ok(cfg)
    }
}
