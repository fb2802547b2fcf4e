use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, header::AUTHORIZATION};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};
use url::Url;

use crate::api::{ApiError, FailureKind, MovieApi};
use crate::models::{Credentials, FavoritesPayload, NewUser, UserUpdate};
use crate::session::SessionStore;

/// Whether a request carries the session's bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    None,
    Bearer,
}

/// HTTP client for the movie service
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client rooted at `base_url`.
    ///
    /// The token is not captured here: it is read from `session` on every
    /// authenticated request.
    pub fn new(base_url: Url, timeout: Option<Duration>, session: SessionStore) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            session,
        })
    }

    /// Resolve `segments` against the base URL, percent-encoding each one.
    ///
    /// Empty, `.` and `..` parameters are rejected: the URL parser would drop
    /// or resolve them and the request would reach another endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            warn!("Refusing path parameter {:?}", bad);
            return Err(ApiError::new(FailureKind::Validation));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                error!("Base URL {} cannot carry a path", self.base_url);
                ApiError::transient()
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        auth: Auth,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if auth == Auth::Bearer {
            if let Some(token) = self.session.token() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Some error occurred: {} {} failed: {}", method, url, e);
            ApiError::transient()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body of {} {}: {}", method, url, e);
            ApiError::transient()
        })?;

        if !status.is_success() {
            error!("Error Status code {}, Error body is: {}", status.as_u16(), text);
            return Err(ApiError::from_status(status));
        }

        extract_response_data(&text, method == Method::DELETE).inspect_err(|_| {
            error!("Unreadable response body of {} {}: {}", method, url, text);
        })
    }

    async fn get(&self, segments: &[&str]) -> Result<Value, ApiError> {
        self.send::<Value>(Method::GET, segments, None, Auth::Bearer).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value, ApiError> {
        self.send::<Value>(Method::DELETE, segments, None, Auth::Bearer).await
    }
}

/// Decode a success body. Absent or `null` bodies become `{}`. Bodies that
/// are not JSON fail, except on deletes where the service confirms in plain
/// text; those are kept as a JSON string.
fn extract_response_data(text: &str, plain_text_ok: bool) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Ok(json!({})),
        Ok(value) => Ok(value),
        Err(_) if plain_text_ok => Ok(Value::String(text.to_string())),
        Err(_) => Err(ApiError::transient()),
    }
}

#[async_trait]
impl MovieApi for ApiClient {
    async fn register(&self, details: &NewUser) -> Result<Value, ApiError> {
        self.send(Method::POST, &["users", "register"], Some(details), Auth::None).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.send(Method::POST, &["login"], Some(credentials), Auth::None).await
    }

    async fn list_movies(&self) -> Result<Value, ApiError> {
        self.get(&["movies"]).await
    }

    async fn get_movie(&self, title: &str) -> Result<Value, ApiError> {
        self.get(&["movies", title]).await
    }

    async fn get_director(&self, name: &str) -> Result<Value, ApiError> {
        self.get(&["director", name]).await
    }

    async fn get_genre(&self, name: &str) -> Result<Value, ApiError> {
        self.get(&["genre", name]).await
    }

    async fn list_users(&self) -> Result<Value, ApiError> {
        self.get(&["users"]).await
    }

    async fn get_user(&self, username: &str) -> Result<Value, ApiError> {
        self.get(&["users", username]).await
    }

    async fn edit_user(&self, username: &str, update: &UserUpdate) -> Result<Value, ApiError> {
        self.send(Method::PUT, &["users", username], Some(update), Auth::Bearer).await
    }

    async fn delete_user(&self, username: &str) -> Result<Value, ApiError> {
        self.delete(&["users", username]).await
    }

    async fn add_favorite(&self, username: &str, favorites: &FavoritesPayload) -> Result<Value, ApiError> {
        self.send(Method::POST, &["users", username, "favorites"], Some(favorites), Auth::Bearer)
            .await
    }

    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Value, ApiError> {
        self.delete(&["users", username, "favorites", movie_id]).await
    }
}
