//! # myflix
//!
//! Command-line client for the myFlix movie service: log in, browse the
//! catalog, look up directors and genres, and keep a list of favorite movies.
//!
//! ## Architecture
//! - `config`: environment variable configuration
//! - `models`: serde types for the service's JSON schema
//! - `session`: the persisted user/token session
//! - `api`: reqwest client with one method per service endpoint
//! - `flows`: login, registration, movie list/favorites, profile, dialogs
//! - `cli`: clap subcommands dispatching to the flows
//!
//! ## Environment Setup
//! Settings are read from the environment or a `.env` file:
//! ```bash
//! MYFLIX_API_URL=https://robs-movie-api-981dce4af120.herokuapp.com/
//! MYFLIX_SESSION_FILE=~/.myflix/session.json
//! MYFLIX_HTTP_TIMEOUT_SECS=30
//! ```
//!
//! ## Usage
//! ```bash
//! myflix login --username rob --password hunter2
//! myflix movies
//! myflix favorite toggle 64a1f0c2e4b0a1b2c3d4e5f6
//! ```

mod api;
mod cli;
mod config;
mod flows;
mod models;
mod session;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{ApiClient, FailureKind};
use crate::cli::Cli;
use crate::config::{Config, parse_api_url};
use crate::flows::{FlowContext, FlowError};
use crate::flows::notify::TerminalNotifier;
use crate::session::{SessionError, SessionStore};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("myflix=warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration from environment")?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = parse_api_url(api_url)?;
    }
    if let Some(session_file) = &cli.session_file {
        config.session_file = session_file.clone();
    }
    tracing::debug!("📦 {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::debug!("🌐 Movie service: {}", config.api_url);

    let session = SessionStore::open(config.session_file.clone())
        .with_context(|| format!("Failed to open session file {}", config.session_file.display()))?;
    let api = ApiClient::new(config.api_url.clone(), config.http_timeout, session.clone())
        .context("Failed to create HTTP client")?;
    let ctx = FlowContext::new(Arc::new(api), session, Arc::new(TerminalNotifier));

    // Failures were already reported through the notifier
    match cli::run(cli.command, ctx).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            if needs_login(&e) {
                eprintln!("Run `myflix login` to start a new session.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn needs_login(error: &FlowError) -> bool {
    match error {
        FlowError::Api(e) => e.kind() == FailureKind::Unauthorized,
        FlowError::Session(SessionError::NoSession) => true,
        _ => false,
    }
}
