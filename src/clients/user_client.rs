use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::actor_framework::{Filter, ResourceClient};
use crate::domain::{PasswordResetToken, ResetTokenCreate, User, UserCreate, UserPatch};
use crate::user_actor::{ResetTokenAction, UserError};

/// Client for the user table and the password-reset tokens that hang off it.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
    reset_tokens: ResourceClient<PasswordResetToken>,
}

impl_client_methods!(UserClient, User, String, UserError, user, users);

impl UserClient {
    pub fn new(inner: ResourceClient<User>, reset_tokens: ResourceClient<PasswordResetToken>) -> Self {
        Self { inner, reset_tokens }
    }

    #[instrument(skip(self, params), fields(username = %params.username))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    /// Looks a user up by username or email.
    #[instrument(skip(self))]
    pub async fn find_by_login(&self, login: String) -> Result<Option<User>, UserError> {
        let users = self
            .list_users(Filter::new(move |u: &User| u.answers_to(&login)))
            .await?;
        Ok(users.into_iter().next())
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: String) -> Result<Option<User>, UserError> {
        let users = self
            .list_users(Filter::new(move |u: &User| u.email.eq_ignore_ascii_case(&email)))
            .await?;
        Ok(users.into_iter().next())
    }

    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: String, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self, params), fields(user_id = %params.user_id))]
    pub async fn create_reset_token(&self, params: ResetTokenCreate) -> Result<PasswordResetToken, UserError> {
        self.reset_tokens.create(params).await
    }

    /// Marks a reset token used and returns the user it was issued for.
    #[instrument(skip(self, token))]
    pub async fn redeem_reset_token(&self, token: String, now: DateTime<Utc>) -> Result<String, UserError> {
        match self
            .reset_tokens
            .perform_action(token, ResetTokenAction::Redeem { now })
            .await
        {
            Err(UserError::NotFound(_)) => Err(UserError::InvalidResetToken("unknown token".to_string())),
            other => other,
        }
    }
}
