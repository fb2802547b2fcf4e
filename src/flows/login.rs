//! Login form: submits credentials and opens a session on success.

use tracing::{debug, info};

use crate::flows::{FlowContext, FlowError, decode};
use crate::models::{Credentials, LoginResponse, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    Success,
    Failure,
}

pub struct LoginForm {
    ctx: FlowContext,
    credentials: Credentials,
    state: LoginState,
    open: bool,
}

impl LoginForm {
    pub fn new(ctx: FlowContext, credentials: Credentials) -> Self {
        Self {
            ctx,
            credentials,
            state: LoginState::Idle,
            open: true,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// The form closes itself after a successful login
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Send the credentials. On success the user and token are stored in the
    /// session; on failure the session is left as it was and the form stays
    /// open so it can be submitted again.
    pub async fn submit(&mut self) -> Result<User, FlowError> {
        self.state = LoginState::Submitting;
        info!("Logging in as {}", self.credentials.username);
        if self.ctx.session.is_active() {
            debug!("A session is already open; it is replaced only if this login succeeds");
        }

        match self.try_login().await {
            Ok(user) => {
                self.state = LoginState::Success;
                self.open = false;
                self.ctx.success("Login successful");
                Ok(user)
            }
            Err(e) => {
                self.state = LoginState::Failure;
                self.ctx.failure(format!("Login failed: {}", e));
                Err(e)
            }
        }
    }

    async fn try_login(&self) -> Result<User, FlowError> {
        let body = self.ctx.api.login(&self.credentials).await?;
        let LoginResponse { user, token } = decode(body)?;
        self.ctx.session.start(&user, &token)?;
        Ok(user)
    }
}
