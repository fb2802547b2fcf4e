//! # API Module
//!
//! Data-access layer for the remote movie service.
//!
//! - `client`: reqwest-backed [`ApiClient`], one method per endpoint
//! - `error`: the generic [`ApiError`] every failed request collapses into
//!
//! Flows talk to the service through the [`MovieApi`] trait so they can run
//! against any implementation.

pub mod client;
pub mod error;

#[cfg(test)]
pub mod mock_server;

pub use client::ApiClient;
pub use error::{ApiError, FailureKind};

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Credentials, FavoritesPayload, NewUser, UserUpdate};

/// One operation per remote endpoint.
///
/// Each call resolves exactly once, to the decoded response body (an empty
/// object when the service sent none) or to an [`ApiError`]. Every operation
/// except `register` and `login` is sent with the session's bearer token.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// `POST users/register`
    async fn register(&self, details: &NewUser) -> Result<Value, ApiError>;
    /// `POST login`
    async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError>;
    /// `GET movies`
    async fn list_movies(&self) -> Result<Value, ApiError>;
    /// `GET movies/{title}`
    async fn get_movie(&self, title: &str) -> Result<Value, ApiError>;
    /// `GET director/{name}`
    async fn get_director(&self, name: &str) -> Result<Value, ApiError>;
    /// `GET genre/{name}`
    async fn get_genre(&self, name: &str) -> Result<Value, ApiError>;
    /// `GET users`
    async fn list_users(&self) -> Result<Value, ApiError>;
    /// `GET users/{username}`
    async fn get_user(&self, username: &str) -> Result<Value, ApiError>;
    /// `PUT users/{username}`
    async fn edit_user(&self, username: &str, update: &UserUpdate) -> Result<Value, ApiError>;
    /// `DELETE users/{username}`
    async fn delete_user(&self, username: &str) -> Result<Value, ApiError>;
    /// `POST users/{username}/favorites`
    async fn add_favorite(&self, username: &str, favorites: &FavoritesPayload) -> Result<Value, ApiError>;
    /// `DELETE users/{username}/favorites/{movie_id}`
    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Value, ApiError>;
}
