//! Resource kinds, format revisions and well-known names.

/// Namespace assigned to resources that do not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Kind of the static tokens configuration resource.
pub const KIND_STATIC_TOKENS: &str = "static_tokens";

/// Kind of a single provisioning token.
pub const KIND_TOKEN: &str = "token";

/// Name of the one static tokens instance a system carries.
pub const META_NAME_STATIC_TOKENS: &str = "static_tokens";

pub const V1: &str = "v1";
pub const V2: &str = "v2";
