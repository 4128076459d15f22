use std::str::FromStr;

use itertools::Itertools;

use crate::error::ResourceError;
use crate::types::{
    ProvisionTokenV1, StaticTokensSpecV2, StaticTokensV2, SystemRole, default_static_tokens,
    new_static_tokens,
};

/// Parse a static token from file configuration.
///
/// The format is `roles:token`, where `roles` is a comma-separated list of
/// built-in system roles (case-insensitive) and `token` is everything after the first
/// colon. Repeated roles are collapsed. Static tokens never expire.
///
/// Example:
/// ```rust
/// use static_tokens_core::{SystemRole, parse_static_token};
/// let token = parse_static_token("node,proxy:s3cr3t").unwrap();
/// assert_eq!(token.roles, vec![SystemRole::Node, SystemRole::Proxy]);
/// assert_eq!(token.token, "s3cr3t");
/// ```
pub fn parse_static_token(text: &str) -> Result<ProvisionTokenV1, ResourceError> {
    let (roles, token) = text.trim().split_once(':').ok_or_else(|| {
        ResourceError::bad_parameter("static token is in the wrong format, expected roles:token")
    })?;

    if token.is_empty() {
        return Err(ResourceError::bad_parameter("static token is missing the token"));
    }

    let roles: Vec<SystemRole> = roles
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| match SystemRole::from_str(r) {
            Ok(role) if role.is_builtin() => Ok(role),
            _ => Err(ResourceError::bad_parameter(format!("invalid role {r:?}"))),
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unique()
        .collect();

    if roles.is_empty() {
        return Err(ResourceError::bad_parameter("static token is missing roles"));
    }

    Ok(ProvisionTokenV1::new(token, roles, None))
}

/// Build the static tokens resource from file configuration entries.
///
/// No entries yields [`default_static_tokens`].
pub fn static_tokens_from_config<I, S>(entries: I) -> Result<StaticTokensV2, ResourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens = entries
        .into_iter()
        .map(|entry| parse_static_token(entry.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    if tokens.is_empty() {
        return Ok(default_static_tokens());
    }
    new_static_tokens(StaticTokensSpecV2::new(tokens))
}
