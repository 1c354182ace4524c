//! Accounts and bearer tokens: registration, login and the password-reset
//! flow on top of the user table.

pub mod password;
pub mod token;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::clients::UserClient;
use crate::domain::{
    AuthSession, ForgotPasswordRequest, Language, LoginRequest, PasswordResetToken, RegisterRequest,
    ResetPasswordRequest, ResetTokenCreate, Role, User, UserCreate, UserPatch,
};
use crate::user_actor::UserError;

pub use token::{Claims, TokenError, TokenSigner};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid bearer token: {0}")]
    Token(#[from] TokenError),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    User(#[from] UserError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("reset token expiry out of range")]
    ExpiryOutOfRange,
}

/// Account operations shared by the auth routes and the startup seeding.
#[derive(Clone)]
pub struct AccountService {
    users: UserClient,
    signer: TokenSigner,
    reset_ttl: Duration,
}

impl AccountService {
    pub fn new(users: UserClient, signer: TokenSigner, reset_ttl: Duration) -> Self {
        Self {
            users,
            signer,
            reset_ttl,
        }
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let user = self
            .create_account(
                request.username,
                request.email,
                &request.password,
                Role::Customer,
                request.preferred_language,
            )
            .await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Creates the configured admin unless an account with that username or
    /// email already exists.
    #[instrument(skip(self, email, password))]
    pub async fn ensure_admin(&self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if let Some(existing) = self.users.find_by_login(username.to_string()).await? {
            if existing.role != Role::Admin {
                warn!(user_id = %existing.id, "Configured admin name belongs to a customer account");
            }
            return Ok(existing);
        }
        let admin = self
            .create_account(
                username.to_string(),
                email.to_string(),
                password,
                Role::Admin,
                Language::default(),
            )
            .await?;
        info!(user_id = %admin.id, "Admin account created");
        Ok(admin)
    }

    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let user = match self.users.find_by_login(request.login).await? {
            Some(user) if password::verify_password(&request.password, &user.password_hash) => user,
            _ => {
                warn!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };
        let token = self.signer.issue(&user.id, user.role)?;
        info!(user_id = %user.id, "Login succeeded");
        Ok(AuthSession { token, user })
    }

    /// Issues a reset token for a known email. Unknown emails succeed
    /// silently and return `None`.
    #[instrument(skip(self, request))]
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<Option<PasswordResetToken>, AuthError> {
        let email = request.email.trim().to_string();
        let Some(user) = self.users.find_by_email(email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(None);
        };

        let expires_at = Utc::now()
            .checked_add_signed(self.reset_ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let reset = self
            .users
            .create_reset_token(ResetTokenCreate {
                token: token::random_secret(),
                user_id: user.id.clone(),
                expires_at,
            })
            .await?;
        // No mail delivery; the token is handed over through the log.
        info!(user_id = %user.id, token = %reset.token, expires_at = %reset.expires_at, "Password reset token issued");
        Ok(Some(reset))
    }

    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AuthError> {
        validate_password(&request.new_password)?;
        let password_hash = hash(&request.new_password)?;
        let user_id = self.users.redeem_reset_token(request.token, Utc::now()).await?;
        self.users
            .update_user(
                user_id.clone(),
                UserPatch {
                    password_hash: Some(password_hash),
                    preferred_language: None,
                },
            )
            .await?;
        info!(user_id = %user_id, "Password reset");
        Ok(())
    }

    pub fn authenticate(&self, bearer: &str) -> Result<Claims, AuthError> {
        Ok(self.signer.verify(bearer)?)
    }

    async fn create_account(
        &self,
        username: String,
        email: String,
        password: &str,
        role: Role,
        preferred_language: Language,
    ) -> Result<User, AuthError> {
        validate_password(password)?;
        let user = self
            .users
            .create_user(UserCreate {
                username,
                email,
                password_hash: hash(password)?,
                role,
                preferred_language,
            })
            .await?;
        Ok(user)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, AuthError> {
    password::hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))
}
