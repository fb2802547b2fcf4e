//! Session store shared by the API client and the flows.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{FileStore, KeyValueStore, SessionError, TOKEN_KEY, USER_KEY};
use crate::models::User;

/// Handle to the current session. Clones share the same underlying storage.
///
/// Entries are read fresh on every call, so a token written by one component
/// is seen by the next request another component issues.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<Mutex<Box<dyn KeyValueStore>>>,
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Box::new(backend))),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(super::MemoryStore::default())
    }

    /// Open a file-backed session at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        Ok(Self::new(FileStore::open(path)?))
    }

    /// Current bearer token, if any. Empty tokens count as absent.
    pub fn token(&self) -> Option<String> {
        self.backend.lock().get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Current user, if any
    pub fn user(&self) -> Result<Option<User>, SessionError> {
        let raw = self.backend.lock().get(USER_KEY);
        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                key: USER_KEY.to_string(),
                source,
            })
        })
        .transpose()
    }

    /// Current user, failing with [`SessionError::NoSession`] when nobody is logged in
    pub fn require_user(&self) -> Result<User, SessionError> {
        self.user()?.ok_or(SessionError::NoSession)
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the session with a freshly logged-in user and its token.
    /// Both entries are written in one batch; on failure the previous
    /// session stays intact.
    pub fn start(&self, user: &User, token: &str) -> Result<(), SessionError> {
        let serialized = serialize_user(user)?;
        self.backend
            .lock()
            .set_all(vec![(USER_KEY, serialized), (TOKEN_KEY, token.to_string())])?;
        info!("Session started for {}", user.username);
        Ok(())
    }

    /// Overwrite the stored user, keeping the token
    pub fn save_user(&self, user: &User) -> Result<(), SessionError> {
        let serialized = serialize_user(user)?;
        self.backend.lock().set(USER_KEY, serialized)?;
        debug!("Session user {} updated", user.username);
        Ok(())
    }

    /// Drop both session entries
    pub fn clear(&self) -> Result<(), SessionError> {
        self.backend.lock().remove_all(&[USER_KEY, TOKEN_KEY])?;
        info!("Session cleared");
        Ok(())
    }
}

fn serialize_user(user: &User) -> Result<String, SessionError> {
    serde_json::to_string(user).map_err(|source| SessionError::Corrupt {
        key: USER_KEY.to_string(),
        source,
    })
}
