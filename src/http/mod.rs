//! The axum HTTP surface: routes, auth middleware and error rendering.

mod auth;
mod cart;
pub mod error;
pub mod middleware;
mod orders;
mod products;

#[cfg(test)]
mod tests;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::auth::AccountService;
use crate::clients::{CartClient, OrderClient, ProductClient};
use crate::domain::Role;
use middleware::{require_auth, require_role};

pub use error::ApiError;
pub use middleware::AuthUser;

/// Everything a handler can reach. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductClient,
    pub orders: OrderClient,
    pub cart: CartClient,
    pub accounts: AccountService,
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password));

    let customer = Router::new()
        .route("/orders", post(orders::place_order).get(orders::list_my_orders))
        .route("/orders/{id}", get(orders::get_my_order))
        .route(
            "/cart",
            get(cart::list_cart).post(cart::add_to_cart).delete(cart::clear_cart),
        )
        .route(
            "/cart/{product_id}",
            patch(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // Layers run outermost first: authenticate, then check the role.
    let admin = Router::new()
        .route("/products", post(products::create_product))
        .route("/products/{id}", patch(products::update_product))
        .route("/orders/admin", get(orders::list_all_orders))
        .route("/orders/{id}/status", patch(orders::update_order_status))
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(customer)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
