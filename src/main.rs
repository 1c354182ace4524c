mod actor_framework;
mod app_system;
mod auth;
mod cart_actor;
mod clients;
mod config;
mod domain;
mod http;
mod order_actor;
mod product_actor;
mod store;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use tracing::{error, info};

use crate::app_system::{setup_tracing, StorefrontSystem, SystemError};
use crate::config::StorefrontConfig;

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = StorefrontConfig::from_env();
    info!(bind = %config.bind_addr, "Starting storefront");

    let system = StorefrontSystem::new(&config);
    system.seed(&config).await?;

    let app = http::build_router(system.app_state());
    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and its state are gone; the actors can drain now.
    system.shutdown().await?;
    info!("Storefront stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
