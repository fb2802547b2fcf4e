//! Test doubles for flow tests: a scripted [`MovieApi`] and a recording
//! [`Notifier`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::api::{ApiError, FailureKind, MovieApi};
use crate::flows::{FlowContext, Notification, Notifier};
use crate::models::{Credentials, FavoritesPayload, NewUser, User, UserUpdate};
use crate::session::SessionStore;

/// One recorded call: operation name, path arguments and serialized body
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub args: Vec<String>,
    pub body: Option<Value>,
}

/// Answers each operation with a scripted result; unscripted operations
/// succeed with `{}`.
#[derive(Default)]
pub struct StubApi {
    responses: Mutex<HashMap<&'static str, Result<Value, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl StubApi {
    pub fn ok(self, op: &'static str, body: Value) -> Self {
        self.responses.lock().insert(op, Ok(body));
        self
    }

    pub fn fail(self, op: &'static str, kind: FailureKind) -> Self {
        self.responses.lock().insert(op, Err(ApiError::new(kind)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn answer(&self, op: &'static str, args: &[&str], body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().push(Call {
            op,
            args: args.iter().map(|a| a.to_string()).collect(),
            body,
        });
        self.responses.lock().get(op).cloned().unwrap_or_else(|| Ok(json!({})))
    }
}

#[async_trait]
impl MovieApi for StubApi {
    async fn register(&self, details: &NewUser) -> Result<Value, ApiError> {
        self.answer("register", &[], serde_json::to_value(details).ok())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.answer("login", &[], serde_json::to_value(credentials).ok())
    }

    async fn list_movies(&self) -> Result<Value, ApiError> {
        self.answer("list_movies", &[], None)
    }

    async fn get_movie(&self, title: &str) -> Result<Value, ApiError> {
        self.answer("get_movie", &[title], None)
    }

    async fn get_director(&self, name: &str) -> Result<Value, ApiError> {
        self.answer("get_director", &[name], None)
    }

    async fn get_genre(&self, name: &str) -> Result<Value, ApiError> {
        self.answer("get_genre", &[name], None)
    }

    async fn list_users(&self) -> Result<Value, ApiError> {
        self.answer("list_users", &[], None)
    }

    async fn get_user(&self, username: &str) -> Result<Value, ApiError> {
        self.answer("get_user", &[username], None)
    }

    async fn edit_user(&self, username: &str, update: &UserUpdate) -> Result<Value, ApiError> {
        self.answer("edit_user", &[username], serde_json::to_value(update).ok())
    }

    async fn delete_user(&self, username: &str) -> Result<Value, ApiError> {
        self.answer("delete_user", &[username], None)
    }

    async fn add_favorite(&self, username: &str, favorites: &FavoritesPayload) -> Result<Value, ApiError> {
        self.answer("add_favorite", &[username], serde_json::to_value(favorites).ok())
    }

    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Value, ApiError> {
        self.answer("remove_favorite", &[username, movie_id], None)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

pub fn user(username: &str, favorites: &[&str]) -> User {
    User {
        id: Some(format!("id-{username}")),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        birthday: None,
        favorite_movies: favorites.iter().map(|f| f.to_string()).collect(),
    }
}

/// Context wired to `api`, a fresh in-memory session and a recording notifier
pub fn context(api: StubApi) -> (FlowContext, Arc<StubApi>, Arc<RecordingNotifier>) {
    let api = Arc::new(api);
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = FlowContext::new(api.clone(), SessionStore::in_memory(), notifier.clone());
    (ctx, api, notifier)
}
