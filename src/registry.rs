//! Process-wide, replaceable marshalers.
//!
//! Each resource type has one active marshaler. It starts out as the
//! built-in one and may be swapped at any time, e.g. by a build that ships an
//! extended version of the resource. Readers clone the handle and release the
//! lock before encoding or decoding, so a swap never waits on a codec call and
//! a call in flight keeps using the marshaler it started with.

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::codec::{DefaultStaticTokensMarshaler, StaticTokensMarshaler};
use crate::error::ResourceError;
use crate::options::MarshalOption;
use crate::types::StaticTokens;

/// A lock-guarded handle to the active marshaler of one resource type.
pub struct MarshalerSlot<M: ?Sized> {
    active: RwLock<Arc<M>>,
}

impl<M: ?Sized> MarshalerSlot<M> {
    pub fn new(initial: Arc<M>) -> Self {
        Self {
            active: RwLock::new(initial),
        }
    }

    /// Replace the active marshaler.
    pub fn set(&self, marshaler: Arc<M>) {
        // The slot only ever holds a complete pointer, so a poisoned lock is
        // still consistent.
        let mut guard = self.active.write().unwrap_or_else(|poisoned| {
            warn!(event = "Marshaler", phase = "Set", "recovering poisoned marshaler lock");
            PoisonError::into_inner(poisoned)
        });
        *guard = marshaler;
    }

    /// The active marshaler.
    pub fn get(&self) -> Arc<M> {
        let guard = self.active.read().unwrap_or_else(|poisoned| {
            warn!(event = "Marshaler", phase = "Get", "recovering poisoned marshaler lock");
            PoisonError::into_inner(poisoned)
        });
        Arc::clone(&guard)
    }
}

static STATIC_TOKENS_MARSHALER: Lazy<MarshalerSlot<dyn StaticTokensMarshaler>> =
    Lazy::new(|| MarshalerSlot::new(default_static_tokens_marshaler()));

/// A fresh instance of the built-in static tokens marshaler.
pub fn default_static_tokens_marshaler() -> Arc<dyn StaticTokensMarshaler> {
    Arc::new(DefaultStaticTokensMarshaler::new())
}

/// Replace the process-wide static tokens marshaler.
pub fn set_static_tokens_marshaler(marshaler: Arc<dyn StaticTokensMarshaler>) {
    STATIC_TOKENS_MARSHALER.set(marshaler);
    info!(event = "Marshaler", phase = "Set", kind = "static_tokens");
}

/// The process-wide static tokens marshaler.
pub fn get_static_tokens_marshaler() -> Arc<dyn StaticTokensMarshaler> {
    STATIC_TOKENS_MARSHALER.get()
}

/// Encode static tokens with the process-wide marshaler.
pub fn marshal_static_tokens(
    tokens: &dyn StaticTokens,
    opts: &[MarshalOption],
) -> Result<Vec<u8>, ResourceError> {
    get_static_tokens_marshaler().marshal(tokens, opts)
}

/// Decode static tokens with the process-wide marshaler.
pub fn unmarshal_static_tokens(
    bytes: &[u8],
    opts: &[MarshalOption],
) -> Result<Box<dyn StaticTokens>, ResourceError> {
    get_static_tokens_marshaler().unmarshal(bytes, opts)
}
