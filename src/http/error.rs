use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::auth::{AuthError, TokenError};
use crate::cart_actor::CartError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Error returned by every handler, rendered as
/// `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InsufficientStock(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::InsufficientStock(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "ALREADY_EXISTS",
            ApiError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "Internal error");
                "internal server error".to_string()
            }
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::InsufficientStock(m) => m,
        };
        let body = json!({ "error": { "code": code, "message": message } });
        (status, Json(body)).into_response()
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(_) => ApiError::NotFound(e.to_string()),
            ProductError::InsufficientStock { .. } => ApiError::InsufficientStock(e.to_string()),
            ProductError::InvalidQuantity(_) | ProductError::ValidationError(_) => {
                ApiError::BadRequest(e.to_string())
            }
            ProductError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) | OrderError::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
            OrderError::InsufficientStock { .. } => ApiError::InsufficientStock(e.to_string()),
            OrderError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            OrderError::StorageError(_) | OrderError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::NotFound(_) | CartError::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
            CartError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            CartError::InvalidQuantity(_) => ApiError::BadRequest(e.to_string()),
            CartError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => ApiError::NotFound(e.to_string()),
            UserError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            UserError::ValidationError(_) | UserError::InvalidResetToken(_) => {
                ApiError::BadRequest(e.to_string())
            }
            UserError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Token(TokenError::Signing(_))
            | AuthError::Hashing(_)
            | AuthError::ExpiryOutOfRange => ApiError::Internal(e.to_string()),
            AuthError::InvalidCredentials | AuthError::Token(_) => ApiError::Unauthorized(e.to_string()),
            AuthError::Validation(message) => ApiError::BadRequest(message),
            AuthError::User(inner) => inner.into(),
        }
    }
}
