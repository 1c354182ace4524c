use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use super::error::ApiError;
use super::AppState;
use crate::domain::Role;

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

/// Rejects requests without a valid bearer token and stores the caller in
/// the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    let claims = state.accounts.authenticate(token).inspect_err(|e| {
        warn!(error = %e, "Bearer token rejected");
    })?;
    debug!(user_id = %claims.sub, role = %claims.role, "Authenticated");
    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// Runs after [`require_auth`]; the state is the role the route requires.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::Unauthorized("not authenticated".to_string()))?;
    if user.role != required {
        warn!(user_id = %user.user_id, role = %user.role, %required, "Role check failed");
        return Err(ApiError::Forbidden(format!("{required} role required")));
    }
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
