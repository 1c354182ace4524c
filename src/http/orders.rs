use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, AppState, AuthUser};
use crate::domain::{LineRequest, Order, OrderStatusUpdate, ShippingInfo};

/// Body of `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<LineRequest>,
    #[serde(default)]
    pub shipping: ShippingInfo,
}

#[instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn place_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state
        .orders
        .place_order(user.user_id, body.items, body.shipping)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_orders_for_user(user.user_id).await?))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_my_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get_order_for_user(user.user_id, id).await?))
}

#[instrument(skip(state))]
pub async fn list_all_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_all_orders().await?))
}

/// Admin override: any status may replace any other.
#[instrument(skip(state))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<OrderStatusUpdate>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.update_status(id, update.status).await?))
}
