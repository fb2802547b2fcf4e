//! # Session Module
//!
//! Holds the logged-in user's profile and bearer token. The session is an
//! explicit object handed to every component that needs it instead of global
//! state. Storage is pluggable: an in-memory map for tests and a JSON file
//! that survives restarts.

pub mod backend;
pub mod store;

pub use backend::{FileStore, KeyValueStore};
#[cfg(test)]
pub use backend::MemoryStore;
pub use store::SessionStore;

use thiserror::Error;

/// Storage key of the bearer token entry
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized user entry
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no user is logged in")]
    NoSession,

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("stored session entry `{key}` is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
