use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use tracing::instrument;

use super::{ApiError, AppState, AuthUser};
use crate::domain::{AddToCart, CartEntry, CartPatch};

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CartEntry>>, ApiError> {
    Ok(Json(state.cart.list_cart(user.user_id).await?))
}

#[instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddToCart>,
) -> Result<(StatusCode, Json<CartEntry>), ApiError> {
    let entry = state.cart.add_to_cart(user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, patch), fields(user_id = %user.user_id))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<String>,
    Json(patch): Json<CartPatch>,
) -> Result<Json<CartEntry>, ApiError> {
    Ok(Json(state.cart.update_cart_item(user.user_id, product_id, patch).await?))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.cart.remove_cart_item(user.user_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.cart.clear_cart(user.user_id).await?;
    Ok(Json(json!({ "removed": removed })))
}
