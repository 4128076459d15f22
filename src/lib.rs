// src/lib.rs
pub use codec::{DefaultStaticTokensMarshaler, StaticTokensMarshaler};
pub use error::{ErrorKind, ResourceError};
pub use loader::{parse_static_token, static_tokens_from_config};
pub use options::{MarshalConfig, MarshalOption};
pub use registry::{
    MarshalerSlot, default_static_tokens_marshaler, get_static_tokens_marshaler,
    marshal_static_tokens, set_static_tokens_marshaler, unmarshal_static_tokens,
};
pub use schema::{static_tokens_schema, static_tokens_schema_value};
pub use traits::{Clock, FixedClock, Resource, SystemClock};
pub use types::{
    Metadata, ProvisionTokenV1, ProvisionTokenV2, StaticTokens, StaticTokensSpecV2,
    StaticTokensV2, SystemRole, default_static_tokens, new_static_tokens,
    provision_tokens_from_v1, provision_tokens_to_v1,
};
pub use validator::SchemaValidator;

pub mod constants;
pub mod encoding;
pub mod schema;
pub mod types;

mod codec;
mod error;
mod loader;
mod options;
mod registry;
mod traits;
mod validator;
