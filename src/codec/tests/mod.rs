use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use yare::parameterized;

use super::*;
use crate::constants::{DEFAULT_NAMESPACE, KIND_STATIC_TOKENS, META_NAME_STATIC_TOKENS, V2};
use crate::error::ErrorKind;
use crate::types::{
    ProvisionTokenV1, StaticTokensSpecV2, SystemRole, default_static_tokens, new_static_tokens,
};


fn marshaler() -> DefaultStaticTokensMarshaler {
    DefaultStaticTokensMarshaler::new()
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn sample_tokens() -> StaticTokensV2 {
    new_static_tokens(StaticTokensSpecV2::new(vec![
        ProvisionTokenV1::new("node-token", vec![SystemRole::Node], None),
        ProvisionTokenV1::new(
            "proxy-token",
            vec![SystemRole::Proxy, SystemRole::Node],
            Some(at(2031, 2, 3)),
        ),
        ProvisionTokenV1::new("app-token", vec![SystemRole::App], None),
    ]))
    .unwrap()
}

fn as_v2(tokens: &dyn StaticTokens) -> &StaticTokensV2 {
    tokens
        .as_any()
        .downcast_ref::<StaticTokensV2>()
        .expect("default marshaler returns StaticTokensV2")
}

/// Re-encode a JSON document after letting the test change it.
fn edited(tokens: &StaticTokensV2, edit: impl FnOnce(&mut Value)) -> Vec<u8> {
    let mut doc = serde_json::to_value(tokens).unwrap();
    edit(&mut doc);
    serde_json::to_vec(&doc).unwrap()
}
