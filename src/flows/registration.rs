//! Registration form. Does not log the new user in.

use tracing::info;

use crate::flows::{FlowContext, FlowError};
use crate::models::NewUser;

pub struct RegistrationForm {
    ctx: FlowContext,
    details: NewUser,
}

impl RegistrationForm {
    pub fn new(ctx: FlowContext, details: NewUser) -> Self {
        Self { ctx, details }
    }

    pub async fn submit(&self) -> Result<(), FlowError> {
        info!("Registering {}", self.details.username);

        match self.ctx.api.register(&self.details).await {
            Ok(_) => {
                self.ctx.success("Registration successful");
                Ok(())
            }
            Err(e) => {
                self.ctx.failure(format!("Registration failed: {}", e));
                Err(e.into())
            }
        }
    }
}
