//! Roles a provisioning token grants to the joining component.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A system role.
///
/// The string form is the wire form. Parsing is ASCII case-insensitive so
/// file configuration may say `node` or `Node`; names this build does not
/// know parse to [`SystemRole::Other`]. Decoding is exact: a stored name is
/// re-encoded byte for byte.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum SystemRole {
    Auth,
    Node,
    Proxy,
    Admin,
    ProvisionToken,
    #[strum(serialize = "Trusted_cluster")]
    TrustedCluster,
    Signup,
    Nop,
    RemoteProxy,
    Kube,
    App,
    #[strum(serialize = "Db")]
    Database,
    WindowsDesktop,
    /// A role introduced by a newer or extended build.
    #[strum(default, transparent)]
    Other(String),
}

impl SystemRole {
    /// The built-in role spelled exactly `name`, or [`SystemRole::Other`].
    pub fn from_wire(name: &str) -> Self {
        SystemRole::iter()
            .filter(SystemRole::is_builtin)
            .find(|role| role.as_ref() == name)
            .unwrap_or_else(|| SystemRole::Other(name.to_string()))
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, SystemRole::Other(_))
    }
}

impl From<String> for SystemRole {
    fn from(name: String) -> Self {
        SystemRole::from_wire(&name)
    }
}

impl From<SystemRole> for String {
    fn from(role: SystemRole) -> Self {
        match role {
            SystemRole::Other(name) => name,
            builtin => builtin.to_string(),
        }
    }
}
