//! Present-day provisioning token representation.

use std::any::Any;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_NAMESPACE, KIND_TOKEN, V2};
use crate::error::ResourceError;
use crate::traits::{Clock, Resource};

use super::metadata::Metadata;
use super::system_role::SystemRole;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProvisionTokenSpecV2 {
    /// Roles granted to whoever joins with the token.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<SystemRole>,
}

/// A provisioning token. The token secret is the resource name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProvisionTokenV2 {
    kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    sub_kind: String,
    version: String,
    metadata: Metadata,
    spec: ProvisionTokenSpecV2,
}

impl ProvisionTokenV2 {
    /// Create a validated token granting `roles`.
    pub fn new(
        token: impl Into<String>,
        roles: Vec<SystemRole>,
        expires: Option<DateTime<Utc>>,
    ) -> Result<Self, ResourceError> {
        let mut t = Self::from_parts(
            Metadata::new(token, DEFAULT_NAMESPACE).with_expiry(expires),
            roles,
        );
        t.check_and_set_defaults()?;
        Ok(t)
    }

    /// Assemble a token without validating it.
    pub(crate) fn from_parts(metadata: Metadata, roles: Vec<SystemRole>) -> Self {
        Self {
            kind: KIND_TOKEN.to_string(),
            sub_kind: String::new(),
            version: V2.to_string(),
            metadata,
            spec: ProvisionTokenSpecV2 { roles },
        }
    }

    pub fn token(&self) -> &str {
        self.metadata.name()
    }

    pub fn roles(&self) -> &[SystemRole] {
        &self.spec.roles
    }

    pub fn set_roles(&mut self, roles: Vec<SystemRole>) {
        self.spec.roles = roles;
    }

    pub fn check_and_set_defaults(&mut self) -> Result<(), ResourceError> {
        if self.kind.is_empty() {
            self.kind = KIND_TOKEN.to_string();
        }
        if self.version.is_empty() {
            self.version = V2.to_string();
        }
        self.metadata.check_and_set_defaults()?;
        if self.spec.roles.is_empty() {
            return Err(ResourceError::bad_parameter(
                "provisioning token is missing roles",
            ));
        }
        Ok(())
    }
}

/// Renders roles and expiry, never the token itself.
pub(crate) fn fmt_token(
    f: &mut Formatter<'_>,
    roles: &[SystemRole],
    expires: Option<DateTime<Utc>>,
) -> FmtResult {
    let expires = expires.map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    write!(
        f,
        "ProvisionToken(Roles=[{}], Expires={})",
        roles.iter().join(","),
        expires
    )
}

impl Display for ProvisionTokenV2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_token(f, &self.spec.roles, self.metadata.expiry())
    }
}

impl Resource for ProvisionTokenV2 {
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
