//! Resource types and their wire representations.
//!
//! Wire forms (JSON):
//! - StaticTokensV2: `{"kind":"static_tokens","version":"v2","metadata":{..},"spec":{"static_tokens":[..]}}`
//! - ProvisionTokenV1 (stored entry): `{"roles":["Node"],"expires":"..","token":".."}`
//! - ProvisionTokenV2: `{"kind":"token","version":"v2","metadata":{"name":"<token>",..},"spec":{"roles":[..]}}`
//!
//! Optional fields (`sub_kind`, `description`, `labels`, `expires`, `id`) are
//! omitted when unset.

mod metadata;
mod provision_token;
mod provision_token_v1;
mod static_tokens;
mod system_role;

pub use metadata::{LABEL_KEY_PATTERN, Metadata, is_valid_label_key};
pub use provision_token::{ProvisionTokenSpecV2, ProvisionTokenV2};
pub use provision_token_v1::{ProvisionTokenV1, provision_tokens_from_v1, provision_tokens_to_v1};
pub use static_tokens::{
    StaticTokens, StaticTokensSpecV2, StaticTokensV2, default_static_tokens, new_static_tokens,
};
pub use system_role::SystemRole;
