//! Legacy provisioning token entries and their conversion to and from
//! [`ProvisionTokenV2`].
//!
//! The static tokens resource still stores entries in this form; everything
//! else works with the present-day representation.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::DEFAULT_NAMESPACE;
use crate::traits::Resource;

use super::metadata::{Metadata, deserialize_expiry};
use super::provision_token::{ProvisionTokenV2, fmt_token};
use super::system_role::SystemRole;

/// A provisioning token as stored inside the static tokens resource.
///
/// Every field may be absent on the wire. An entry without a token decodes
/// with an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProvisionTokenV1 {
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<SystemRole>,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token: String,
}

impl ProvisionTokenV1 {
    pub fn new(
        token: impl Into<String>,
        roles: Vec<SystemRole>,
        expires: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            roles,
            expires,
            token: token.into(),
        }
    }

    pub fn v2(&self) -> ProvisionTokenV2 {
        ProvisionTokenV2::from_parts(
            Metadata::new(self.token.clone(), DEFAULT_NAMESPACE).with_expiry(self.expires),
            self.roles.clone(),
        )
    }
}

impl ProvisionTokenV2 {
    pub fn v1(&self) -> ProvisionTokenV1 {
        ProvisionTokenV1 {
            roles: self.roles().to_vec(),
            expires: self.expiry(),
            token: self.token().to_string(),
        }
    }
}

impl Display for ProvisionTokenV1 {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_token(f, &self.roles, self.expires)
    }
}

/// Convert present-day tokens into the stored form, keeping their order.
pub fn provision_tokens_to_v1(tokens: &[ProvisionTokenV2]) -> Vec<ProvisionTokenV1> {
    tokens.iter().map(ProvisionTokenV2::v1).collect()
}

/// Convert stored tokens into the present-day form, keeping their order.
pub fn provision_tokens_from_v1(tokens: &[ProvisionTokenV1]) -> Vec<ProvisionTokenV2> {
    tokens.iter().map(ProvisionTokenV1::v2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{KIND_TOKEN, V2};
    use chrono::TimeZone;

    fn legacy_tokens() -> Vec<ProvisionTokenV1> {
        vec![
            ProvisionTokenV1::new("zeta", vec![SystemRole::Node], None),
            ProvisionTokenV1::new(
                "alpha",
                vec![SystemRole::Proxy, SystemRole::Auth],
                Some(Utc.with_ymd_and_hms(2031, 6, 1, 12, 0, 0).unwrap()),
            ),
            ProvisionTokenV1::new("mid", vec![SystemRole::Database], None),
        ]
    }

    #[test]
    fn test_from_v1_preserves_order_and_fields() {
        let legacy = legacy_tokens();
        let present = provision_tokens_from_v1(&legacy);

        assert_eq!(present.len(), legacy.len());
        for (old, new) in legacy.iter().zip(&present) {
            assert_eq!(new.token(), old.token);
            assert_eq!(new.roles(), old.roles.as_slice());
            assert_eq!(new.expiry(), old.expires);
            assert_eq!(new.kind(), KIND_TOKEN);
            assert_eq!(new.version(), V2);
            assert_eq!(new.metadata().namespace(), DEFAULT_NAMESPACE);
        }
    }

    #[test]
    fn test_conversion_is_lossless() {
        let legacy = legacy_tokens();
        let back = provision_tokens_to_v1(&provision_tokens_from_v1(&legacy));
        assert_eq!(legacy, back);
    }

    #[test]
    fn test_empty_lists() {
        assert!(provision_tokens_to_v1(&[]).is_empty());
        assert!(provision_tokens_from_v1(&[]).is_empty());
    }

    #[test]
    fn test_display_never_expires() {
        let token = ProvisionTokenV1::new("s3cr3t", vec![SystemRole::Node], None);
        insta::assert_snapshot!(token.to_string(), @"ProvisionToken(Roles=[Node], Expires=never)");
    }

    #[test]
    fn test_wire_form() {
        let token = ProvisionTokenV1::new("s3cr3t", vec![SystemRole::TrustedCluster], None);
        insta::assert_json_snapshot!(token, @r#"
        {
          "roles": [
            "Trusted_cluster"
          ],
          "token": "s3cr3t"
        }
        "#);
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let token: ProvisionTokenV1 = serde_json::from_str(r#"{"roles":["Node"]}"#).unwrap();
        assert_eq!(token.token, "");
        assert_eq!(token.roles, vec![SystemRole::Node]);

        let bare: ProvisionTokenV1 = serde_json::from_str("{}").unwrap();
        assert!(bare.roles.is_empty());
        assert_eq!(bare.expires, None);
    }

    #[test]
    fn test_zero_expiry_means_never() {
        let token: ProvisionTokenV1 = serde_json::from_str(
            r#"{"roles":["Node"],"expires":"0001-01-01T00:00:00Z","token":"t"}"#,
        )
        .unwrap();
        assert_eq!(token.expires, None);
        assert_eq!(token.v2().expiry(), None);
        insta::assert_snapshot!(token.to_string(), @"ProvisionToken(Roles=[Node], Expires=never)");
    }

    #[test]
    fn test_unlisted_role_survives_conversion() {
        let token: ProvisionTokenV1 =
            serde_json::from_str(r#"{"roles":["Discovery","Node"],"token":"t"}"#).unwrap();
        assert_eq!(
            token.roles,
            vec![SystemRole::Other("Discovery".into()), SystemRole::Node]
        );

        let back = token.v2().v1();
        assert_eq!(back, token);
        assert_eq!(
            serde_json::to_value(&back).unwrap()["roles"],
            serde_json::json!(["Discovery", "Node"])
        );
    }

    #[test]
    fn test_openapi_roles_are_strings() {
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(ProvisionTokenV1::schema()).unwrap();
        assert_eq!(schema["properties"]["roles"]["type"], "array");
        assert_eq!(schema["properties"]["roles"]["items"]["type"], "string");
        assert!(schema["properties"].get("token").is_some());
    }
}
