//! Account management for the logged-in user.

use tracing::info;

use crate::flows::{FlowContext, FlowError, decode};
use crate::models::{User, UserUpdate};

pub struct Profile {
    ctx: FlowContext,
}

impl Profile {
    pub fn new(ctx: FlowContext) -> Self {
        Self { ctx }
    }

    /// Fetch the session user's record and refresh the stored copy
    pub async fn show(&self) -> Result<User, FlowError> {
        let result = self.try_show().await;
        if let Err(e) = &result {
            self.ctx.failure(format!("Could not load profile: {}", e));
        }
        result
    }

    /// Send the changed fields, then merge them into the session user
    pub async fn edit(&self, changes: UserUpdate) -> Result<User, FlowError> {
        match self.try_edit(changes).await {
            Ok(user) => {
                self.ctx.success("Profile updated");
                Ok(user)
            }
            Err(e) => {
                self.ctx.failure(format!("Could not update profile: {}", e));
                Err(e)
            }
        }
    }

    /// Delete the account and end the session
    pub async fn delete(&self) -> Result<(), FlowError> {
        match self.try_delete().await {
            Ok(()) => {
                self.ctx.success("Account deleted");
                Ok(())
            }
            Err(e) => {
                self.ctx.failure(format!("Could not delete account: {}", e));
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<(), FlowError> {
        match self.ctx.session.clear() {
            Ok(()) => {
                self.ctx.success("Logged out");
                Ok(())
            }
            Err(e) => {
                self.ctx.failure(format!("Could not log out: {}", e));
                Err(e.into())
            }
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, FlowError> {
        let body = self.ctx.api.list_users().await?;
        decode(body)
    }

    async fn try_show(&self) -> Result<User, FlowError> {
        let current = self.ctx.session.require_user()?;
        let body = self.ctx.api.get_user(&current.username).await?;
        let fresh: User = decode(body)?;
        self.ctx.session.save_user(&fresh)?;
        Ok(fresh)
    }

    async fn try_edit(&self, changes: UserUpdate) -> Result<User, FlowError> {
        let mut user = self.ctx.session.require_user()?;
        let previous_name = user.username.clone();
        self.ctx.api.edit_user(&previous_name, &changes).await?;

        let UserUpdate {
            username,
            password: _,
            email,
            birthday,
            favorite_movies,
        } = changes;
        if let Some(username) = username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if birthday.is_some() {
            user.birthday = birthday;
        }
        if let Some(favorite_movies) = favorite_movies {
            user.favorite_movies = favorite_movies;
        }

        self.ctx.session.save_user(&user)?;
        info!("Profile of {} updated", previous_name);
        Ok(user)
    }

    async fn try_delete(&self) -> Result<(), FlowError> {
        let user = self.ctx.session.require_user()?;
        self.ctx.api.delete_user(&user.username).await?;
        self.ctx.session.clear()?;
        info!("Account {} deleted", user.username);
        Ok(())
    }
}
