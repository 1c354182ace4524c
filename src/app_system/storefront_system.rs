use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::seed::{seed_admin, seed_catalog};
use super::SystemError;
use crate::actor_framework::ResourceActor;
use crate::auth::{token, AccountService, TokenSigner};
use crate::clients::{CartClient, OrderClient, ProductClient, UserClient};
use crate::config::StorefrontConfig;
use crate::domain::{CartEntry, PasswordResetToken, User};
use crate::http::AppState;
use crate::store::CommerceStore;

/// Prefixed, monotonically increasing ids: `product_1`, `product_2`, ...
fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{prefix}_{}", counter.fetch_add(1, Ordering::SeqCst))
}

/// The running storefront: every actor, wired together.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StorefrontSystem {
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub cart_client: CartClient,
    pub accounts: AccountService,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    pub fn new(config: &StorefrontConfig) -> Self {
        let capacity = config.channel_capacity;

        // 1. Products and orders share one store so orders commit atomically
        let (store, store_client) =
            CommerceStore::new(capacity, id_sequence("product"), id_sequence("order"));
        let store_handle = tokio::spawn(store.run());
        let product_client = ProductClient::new(store_client.products());
        let order_client = OrderClient::new(store_client, product_client.clone());

        // 2. Carts, keyed by (user, product)
        let (cart_actor, cart_resource_client) = ResourceActor::<CartEntry>::keyed(capacity);
        let cart_client = CartClient::new(cart_resource_client, product_client.clone());
        let cart_handle = tokio::spawn(cart_actor.run());

        // 3. Accounts
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(capacity, id_sequence("user"));
        let (token_actor, token_resource_client) = ResourceActor::<PasswordResetToken>::keyed(capacity);
        let user_client = UserClient::new(user_resource_client, token_resource_client);
        let user_handle = tokio::spawn(user_actor.run());
        let token_handle = tokio::spawn(token_actor.run());

        let secret = match &config.jwt_secret {
            Some(secret) => secret.expose().to_string(),
            None => {
                warn!("STOREFRONT_JWT_SECRET not set; tokens will not survive a restart");
                token::random_secret()
            }
        };
        let accounts = AccountService::new(
            user_client,
            TokenSigner::new(secret, config.token_ttl),
            config.reset_ttl,
        );

        info!(capacity, "Storefront actors started");
        Self {
            product_client,
            order_client,
            cart_client,
            accounts,
            handles: vec![store_handle, cart_handle, user_handle, token_handle],
        }
    }

    /// Loads the seed catalog and creates the admin account, when configured.
    pub async fn seed(&self, config: &StorefrontConfig) -> Result<(), SystemError> {
        if let Some(path) = &config.seed_file {
            seed_catalog(&self.product_client, path).await?;
        }
        if let Some(admin) = &config.admin {
            seed_admin(&self.accounts, admin).await?;
        }
        Ok(())
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            products: self.product_client.clone(),
            orders: self.order_client.clone(),
            cart: self.cart_client.clone(),
            accounts: self.accounts.clone(),
        }
    }

    /// Drops the system's clients and waits for the actors to drain. Clones
    /// held elsewhere (the router state) must be dropped first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.product_client);
        drop(self.order_client);
        drop(self.cart_client);
        drop(self.accounts);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::ActorFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
