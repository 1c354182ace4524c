use chrono::{DateTime, Utc};

use super::error::UserError;
use crate::actor_framework::Entity;
use crate::domain::{PasswordResetToken, ResetTokenCreate, User, UserCreate, UserPatch};

impl Entity for User {
    const NAME: &'static str = "users";
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Errors
    /// Rejects a blank username, a username containing `@` (it would read
    /// as an email at login), or an email without `@`.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        let username = params.username.trim().to_string();
        let email = params.email.trim().to_string();
        if username.is_empty() {
            return Err(UserError::ValidationError("Username required".to_string()));
        }
        if username.contains('@') {
            return Err(UserError::ValidationError("Username must not contain '@'".to_string()));
        }
        if !email.contains('@') {
            return Err(UserError::ValidationError("Valid email required".to_string()));
        }
        Ok(Self {
            id,
            username,
            email,
            password_hash: params.password_hash,
            role: params.role,
            preferred_language: params.preferred_language,
            created_at: Utc::now(),
        })
    }

    /// Usernames and emails are unique, ignoring case.
    fn conflicts_with(&self, existing: &Self) -> bool {
        existing.username.eq_ignore_ascii_case(&self.username)
            || existing.email.eq_ignore_ascii_case(&self.email)
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(language) = patch.preferred_language {
            self.preferred_language = language;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ResetTokenAction {
    /// Marks the token used and returns its user id.
    Redeem { now: DateTime<Utc> },
}

impl Entity for PasswordResetToken {
    const NAME: &'static str = "password_reset_tokens";
    type Id = String;
    type CreateParams = ResetTokenCreate;
    type Patch = ();
    type Action = ResetTokenAction;
    type ActionResult = String;
    type Error = UserError;

    fn id(&self) -> &String {
        &self.token
    }

    fn natural_id(params: &ResetTokenCreate) -> Option<String> {
        Some(params.token.clone())
    }

    fn from_create_params(token: String, params: ResetTokenCreate) -> Result<Self, UserError> {
        Ok(Self {
            token,
            user_id: params.user_id,
            expires_at: params.expires_at,
            used: false,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), UserError> {
        Ok(())
    }

    fn handle_action(&mut self, action: ResetTokenAction) -> Result<String, UserError> {
        match action {
            ResetTokenAction::Redeem { now } => {
                if self.used {
                    return Err(UserError::InvalidResetToken("token already used".to_string()));
                }
                if now >= self.expires_at {
                    return Err(UserError::InvalidResetToken("token expired".to_string()));
                }
                self.used = true;
                Ok(self.user_id.clone())
            }
        }
    }
}
