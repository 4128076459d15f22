//! The static tokens configuration resource.
//!
//! Static tokens are a singleton: a system carries at most one instance,
//! named [`META_NAME_STATIC_TOKENS`]. Nothing here enforces that; callers do.

use std::any::Any;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_NAMESPACE, KIND_STATIC_TOKENS, META_NAME_STATIC_TOKENS, V2};
use crate::error::ResourceError;
use crate::traits::{Clock, Resource};

use super::metadata::Metadata;
use super::provision_token::ProvisionTokenV2;
use super::provision_token_v1::{
    ProvisionTokenV1, provision_tokens_from_v1, provision_tokens_to_v1,
};

/// The static tokens used to provision components, whatever the concrete
/// representation.
pub trait StaticTokens: Resource {
    /// A fresh copy of the tokens; changing it does not touch the resource.
    fn static_tokens(&self) -> Vec<ProvisionTokenV2>;

    fn set_static_tokens(&mut self, tokens: &[ProvisionTokenV2]);

    /// Validate the resource and fill in defaults for missing fields.
    fn check_and_set_defaults(&mut self) -> Result<(), ResourceError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StaticTokensSpecV2 {
    /// Stored in the legacy entry form. Absent on the wire means empty.
    #[serde(default)]
    pub static_tokens: Vec<ProvisionTokenV1>,
}

impl StaticTokensSpecV2 {
    pub fn new(static_tokens: Vec<ProvisionTokenV1>) -> Self {
        Self { static_tokens }
    }
}

/// Version 2 of the static tokens resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StaticTokensV2 {
    kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    sub_kind: String,
    version: String,
    metadata: Metadata,
    spec: StaticTokensSpecV2,
}

/// Create a validated static tokens resource holding `spec`.
pub fn new_static_tokens(spec: StaticTokensSpecV2) -> Result<StaticTokensV2, ResourceError> {
    let mut st = StaticTokensV2::with_spec(spec);
    st.check_and_set_defaults()
        .map_err(|e| e.wrap("invalid static tokens"))?;
    Ok(st)
}

/// The static tokens used when configuration names none: an empty list.
pub fn default_static_tokens() -> StaticTokensV2 {
    StaticTokensV2::with_spec(StaticTokensSpecV2::default())
}

impl StaticTokensV2 {
    fn with_spec(spec: StaticTokensSpecV2) -> Self {
        Self {
            kind: KIND_STATIC_TOKENS.to_string(),
            sub_kind: String::new(),
            version: V2.to_string(),
            metadata: Metadata::new(META_NAME_STATIC_TOKENS, DEFAULT_NAMESPACE),
            spec,
        }
    }

    pub fn spec(&self) -> &StaticTokensSpecV2 {
        &self.spec
    }
}

impl StaticTokens for StaticTokensV2 {
    fn static_tokens(&self) -> Vec<ProvisionTokenV2> {
        provision_tokens_from_v1(&self.spec.static_tokens)
    }

    fn set_static_tokens(&mut self, tokens: &[ProvisionTokenV2]) {
        self.spec.static_tokens = provision_tokens_to_v1(tokens);
    }

    fn check_and_set_defaults(&mut self) -> Result<(), ResourceError> {
        self.metadata.check_and_set_defaults()
    }
}

impl Resource for StaticTokensV2 {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn sub_kind(&self) -> &str {
        &self.sub_kind
    }

    fn set_sub_kind(&mut self, sub_kind: String) {
        self.sub_kind = sub_kind;
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn name(&self) -> &str {
        self.metadata.name()
    }

    fn set_name(&mut self, name: String) {
        self.metadata.set_name(name);
    }

    fn resource_id(&self) -> i64 {
        self.metadata.id()
    }

    fn set_resource_id(&mut self, id: i64) {
        self.metadata.set_id(id);
    }

    fn expiry(&self) -> Option<DateTime<Utc>> {
        self.metadata.expiry()
    }

    fn set_expiry(&mut self, expires: Option<DateTime<Utc>>) {
        self.metadata.set_expiry(expires);
    }

    fn set_ttl(&mut self, clock: &dyn Clock, ttl: Duration) -> Result<(), ResourceError> {
        self.metadata.set_ttl(clock, ttl)
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Diagnostic rendering; not meant to be parsed.
impl Display for StaticTokensV2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "StaticTokens([{}])", self.spec.static_tokens.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FixedClock;
    use crate::types::SystemRole;
    use chrono::TimeZone;

    fn sample_spec() -> StaticTokensSpecV2 {
        StaticTokensSpecV2::new(vec![
            ProvisionTokenV1::new("node-token", vec![SystemRole::Node], None),
            ProvisionTokenV1::new(
                "proxy-token",
                vec![SystemRole::Proxy],
                Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            ),
        ])
    }

    #[test]
    fn test_new_static_tokens_stamps_identity() {
        let st = new_static_tokens(sample_spec()).unwrap();
        assert_eq!(st.kind(), KIND_STATIC_TOKENS);
        assert_eq!(st.version(), V2);
        assert_eq!(st.name(), META_NAME_STATIC_TOKENS);
        assert_eq!(st.metadata().namespace(), DEFAULT_NAMESPACE);
        assert_eq!(st.sub_kind(), "");
        assert_eq!(st.resource_id(), 0);
        assert_eq!(st.static_tokens().len(), 2);
    }

    #[test]
    fn test_default_static_tokens_is_empty() {
        let st = default_static_tokens();
        assert_eq!(st.kind(), KIND_STATIC_TOKENS);
        assert_eq!(st.name(), META_NAME_STATIC_TOKENS);
        assert!(st.static_tokens().is_empty());
        assert!(st.spec().static_tokens.is_empty());
    }

    #[test]
    fn test_static_tokens_returns_a_copy() {
        let st = new_static_tokens(sample_spec()).unwrap();

        let mut tokens = st.static_tokens();
        tokens[0].set_roles(vec![SystemRole::Admin]);
        tokens.clear();

        let again = st.static_tokens();
        assert_eq!(again.len(), 2);
        assert_eq!(again[0].roles(), &[SystemRole::Node]);
    }

    #[test]
    fn test_set_static_tokens_keeps_order() {
        let mut st = default_static_tokens();
        let tokens = vec![
            ProvisionTokenV2::new("b", vec![SystemRole::Node], None).unwrap(),
            ProvisionTokenV2::new("a", vec![SystemRole::Kube], None).unwrap(),
        ];
        st.set_static_tokens(&tokens);

        let stored: Vec<&str> = st
            .spec()
            .static_tokens
            .iter()
            .map(|t| t.token.as_str())
            .collect();
        assert_eq!(stored, vec!["b", "a"]);
        assert_eq!(st.static_tokens(), tokens);
    }

    #[test]
    fn test_check_and_set_defaults_is_idempotent() {
        let mut once = default_static_tokens();
        once.metadata = Metadata::new(META_NAME_STATIC_TOKENS, "");
        once.check_and_set_defaults().unwrap();

        let mut twice = once.clone();
        twice.check_and_set_defaults().unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.metadata().namespace(), DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_check_and_set_defaults_reports_metadata_error() {
        let mut st = default_static_tokens();
        st.set_name(String::new());
        let err = st.check_and_set_defaults().unwrap_err();
        assert_eq!(err, ResourceError::bad_parameter("missing parameter name"));
    }

    #[test]
    fn test_expiry_accessors() {
        let mut st = default_static_tokens();
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        st.set_expiry(Some(at));
        assert_eq!(st.expiry(), Some(at));
        st.set_expiry(None);
        assert_eq!(st.expiry(), None);
    }

    #[test]
    #[allow(deprecated)]
    fn test_set_ttl() {
        let mut st = default_static_tokens();
        let clock = FixedClock(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        st.set_ttl(&clock, Duration::from_secs(90)).unwrap();
        assert_eq!(
            st.expiry(),
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 1, 30).unwrap())
        );
    }

    #[test]
    fn test_display() {
        let st = new_static_tokens(sample_spec()).unwrap();
        insta::assert_snapshot!(st.to_string(), @"StaticTokens([ProvisionToken(Roles=[Node], Expires=never), ProvisionToken(Roles=[Proxy], Expires=2030-01-01T00:00:00+00:00)])");
    }

    #[test]
    fn test_wire_form() {
        insta::assert_json_snapshot!(default_static_tokens(), @r#"
        {
          "kind": "static_tokens",
          "version": "v2",
          "metadata": {
            "name": "static_tokens",
            "namespace": "default"
          },
          "spec": {
            "static_tokens": []
          }
        }
        "#);
    }

    #[test]
    fn test_openapi_schema() {
        use serde_json::{Value, json};
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(StaticTokensV2::schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["kind", "sub_kind", "version", "metadata", "spec"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
        let required = schema.get("required").cloned().unwrap_or(Value::Null);
        assert!(required.as_array().unwrap().contains(&json!("kind")));
        assert!(!required.as_array().unwrap().contains(&json!("sub_kind")));

        let spec = serde_json::to_value(StaticTokensSpecV2::schema()).unwrap();
        assert_eq!(spec["properties"]["static_tokens"]["type"], "array");
        let spec_required = spec.get("required").cloned().unwrap_or(json!([]));
        assert!(!spec_required.as_array().unwrap().contains(&json!("static_tokens")));
    }
}
