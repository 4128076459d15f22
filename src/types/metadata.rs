//! Identity and lifetime fields shared by every resource.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::ResourceError;
use crate::traits::Clock;

/// Pattern every label key must match.
pub const LABEL_KEY_PATTERN: &str = r"^[a-zA-Z/.0-9_*-]+$";

static LABEL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(LABEL_KEY_PATTERN).expect("label key pattern is valid"));

/// Returns true if `key` may be used as a label key.
pub fn is_valid_label_key(key: &str) -> bool {
    LABEL_KEY.is_match(key)
}

/// `0001-01-01T00:00:00Z`, the zero timestamp older writers emit for "no expiry".
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// Decode an optional expiry, reading the zero timestamp as no expiry.
pub(crate) fn deserialize_expiry<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let expires = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(expires.filter(|t| !is_zero_time(t)))
}

fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_TIME_UNIX_SECS && t.timestamp_subsec_nanos() == 0
}

/// Resource metadata: name, namespace, labels, expiry and storage ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    expires: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_zero")]
    id: i64,
}

fn is_zero(id: &i64) -> bool {
    *id == 0
}

impl Metadata {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Add a label, returning the updated value.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_expiry(mut self, expires: Option<DateTime<Utc>>) -> Self {
        self.expires = expires;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    pub fn set_expiry(&mut self, expires: Option<DateTime<Utc>>) {
        self.expires = expires;
    }

    /// Set the expiry to `ttl` after `clock.now()`.
    pub fn set_ttl(&mut self, clock: &dyn Clock, ttl: Duration) -> Result<(), ResourceError> {
        let delta = TimeDelta::from_std(ttl)
            .map_err(|_| ResourceError::bad_parameter(format!("ttl {ttl:?} is out of range")))?;
        let expires = clock.now().checked_add_signed(delta).ok_or_else(|| {
            ResourceError::bad_parameter(format!("ttl {ttl:?} overflows the expiry time"))
        })?;
        self.expires = Some(expires);
        Ok(())
    }

    /// Validate the metadata and fill in defaults for missing fields.
    ///
    /// Calling this more than once has no further effect.
    pub fn check_and_set_defaults(&mut self) -> Result<(), ResourceError> {
        if self.name.is_empty() {
            return Err(ResourceError::bad_parameter("missing parameter name"));
        }
        if self.namespace.is_empty() {
            self.namespace = DEFAULT_NAMESPACE.to_string();
        }
        if let Some(key) = self.labels.keys().find(|k| !is_valid_label_key(k)) {
            return Err(ResourceError::bad_parameter(format!(
                "invalid label key: {key:?}"
            )));
        }
        Ok(())
    }
}
