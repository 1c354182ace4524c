use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::instrument;

use super::{ApiError, AppState};
use crate::domain::{
    AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
};

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.accounts.register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.accounts.login(body).await?))
}

/// Answers the same way whether or not the email is registered.
#[instrument(skip(state, body))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    state.accounts.forgot_password(body).await?;
    Ok(Json(json!({
        "message": "If the email is registered, a reset token has been issued"
    })))
}

#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    state.accounts.reset_password(body).await?;
    Ok(Json(json!({ "message": "Password has been reset" })))
}
