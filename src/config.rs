//! Configuration module for environment variables and application settings

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use url::Url;

/// Movie service used when `MYFLIX_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://robs-movie-api-981dce4af120.herokuapp.com/";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is resolved against
    pub api_url: Url,

    /// JSON file holding the session entries
    pub session_file: PathBuf,

    /// Per-request timeout; `None` lets requests run until the service answers
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = parse_api_url(
            &lookup("MYFLIX_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let session_file = match lookup("MYFLIX_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file(lookup("HOME")),
        };

        let http_timeout = lookup("MYFLIX_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("MYFLIX_HTTP_TIMEOUT_SECS must be whole seconds, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            api_url,
            session_file,
            http_timeout,
        })
    }
}

/// Parse a service base URL, forcing a trailing slash so relative endpoint
/// paths land under it rather than replacing its last segment.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&normalized).with_context(|| format!("invalid API URL {raw:?}"))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("API URL {raw:?} cannot have endpoint paths"));
    }
    Ok(url)
}

fn default_session_file(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".myflix").join("session.json"),
        None => PathBuf::from(".myflix-session.json"),
    }
}
