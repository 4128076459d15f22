use std::any::Any;
use std::fmt::{Debug, Display};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ResourceError;
use crate::types::Metadata;

/// Source of the current time for TTL calculations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Common properties every versioned resource exposes, e.g. the static
/// tokens configuration or a single provisioning token.
pub trait Resource: Debug + Display + Send + Sync {
    /// The resource kind, e.g. `static_tokens`.
    fn kind(&self) -> &str;

    fn sub_kind(&self) -> &str;

    fn set_sub_kind(&mut self, sub_kind: String);

    /// The format revision, e.g. `v2`.
    fn version(&self) -> &str;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Storage-assigned ID, zero when unset.
    fn resource_id(&self) -> i64;

    fn set_resource_id(&mut self, id: i64);

    fn expiry(&self) -> Option<DateTime<Utc>>;

    /// Set the expiry, `None` clears it.
    fn set_expiry(&mut self, expires: Option<DateTime<Utc>>);

    /// Set the expiry to `ttl` from now according to `clock`.
    #[deprecated(note = "use set_expiry instead")]
    fn set_ttl(&mut self, clock: &dyn Clock, ttl: Duration) -> Result<(), ResourceError>;

    fn metadata(&self) -> &Metadata;

    /// Access to the concrete type, used by codecs that only understand one
    /// representation of a resource.
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
