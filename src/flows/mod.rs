//! # Flows Module
//!
//! User-facing workflows built on the API client and the session store. Each
//! flow reports its outcome through a [`Notifier`], the terminal counterpart
//! of a snack-bar message.
//!
//! - `login`: credential submission and session creation
//! - `registration`: new account submission
//! - `movies`: catalog listing, favorite checks and toggles, detail lookups
//! - `favorites`: pure add/remove/toggle rules on a favorites list
//! - `profile`: account show/edit/delete and logout
//! - `dialogs`: read-only director, genre and movie detail views

pub mod dialogs;
pub mod favorites;
pub mod login;
pub mod movies;
pub mod notify;
pub mod profile;
pub mod registration;

#[cfg(test)]
pub mod testing;

pub use notify::{Notification, Notifier};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::api::{ApiError, MovieApi};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("unexpected response from the movie service")]
    UnexpectedResponse(#[source] serde_json::Error),
}

/// Everything a flow needs: the service, the session, and where to report.
#[derive(Clone)]
pub struct FlowContext {
    pub api: Arc<dyn MovieApi>,
    pub session: SessionStore,
    pub notifier: Arc<dyn Notifier>,
}

impl FlowContext {
    pub fn new(api: Arc<dyn MovieApi>, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, session, notifier }
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.notifier.notify(Notification::success(message));
    }

    pub(crate) fn failure(&self, message: impl Into<String>) {
        self.notifier.notify(Notification::failure(message));
    }
}

/// Decode a response body into the expected model
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, FlowError> {
    serde_json::from_value(body).map_err(|e| {
        error!("Response did not match the expected shape: {}", e);
        FlowError::UnexpectedResponse(e)
    })
}
