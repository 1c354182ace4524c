use tracing::{debug, info, instrument};

use crate::actor_framework::{Filter, ResourceClient};
use crate::cart_actor::{CartAction, CartError};
use crate::clients::ProductClient;
use crate::domain::{AddToCart, CartCreate, CartEntry, CartKey, CartPatch};
use crate::product_actor::ProductError;

/// Client for the cart table. Adding a product that is already in the cart
/// raises its quantity instead of creating a second row.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<CartEntry>,
    product_client: ProductClient,
}

impl_client_methods!(CartClient, CartEntry, CartKey, CartError, cart_entry, cart_entries);

impl CartClient {
    pub fn new(inner: ResourceClient<CartEntry>, product_client: ProductClient) -> Self {
        Self {
            inner,
            product_client,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_cart(&self, user_id: String) -> Result<Vec<CartEntry>, CartError> {
        let mut entries = self
            .list_cart_entries(Filter::new(move |e: &CartEntry| e.key.user_id == user_id))
            .await?;
        entries.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(entries)
    }

    #[instrument(skip(self, request), fields(product_id = %request.product_id, quantity = request.quantity))]
    pub async fn add_to_cart(&self, user_id: String, request: AddToCart) -> Result<CartEntry, CartError> {
        if request.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        match self.product_client.get_product(request.product_id.clone()).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(CartError::ProductNotFound(request.product_id)),
            Err(ProductError::NotFound(id)) => return Err(CartError::ProductNotFound(id)),
            Err(e) => return Err(CartError::ActorCommunicationError(e.to_string())),
        }

        let key = CartKey::new(user_id, request.product_id);
        let patch = CartPatch {
            quantity: None,
            size: request.size.clone(),
            color: request.color.clone(),
        };
        if self.get_cart_entry(key.clone()).await?.is_none() {
            let params = CartCreate {
                key: key.clone(),
                quantity: request.quantity,
                size: request.size,
                color: request.color,
            };
            // A concurrent add for the same key may win the insert; fall
            // through to the increment in that case.
            match self.inner.create(params).await {
                Ok(entry) => {
                    info!(key = %entry.key, "Added to cart");
                    return Ok(entry);
                }
                Err(CartError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let quantity = self
            .inner
            .perform_action(key.clone(), CartAction::AddQuantity(request.quantity))
            .await?;
        debug!(key = %key, quantity, "Cart quantity increased");
        self.inner.update(key, patch).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_cart_item(
        &self,
        user_id: String,
        product_id: String,
        patch: CartPatch,
    ) -> Result<CartEntry, CartError> {
        self.inner.update(CartKey::new(user_id, product_id), patch).await
    }

    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, user_id: String, product_id: String) -> Result<(), CartError> {
        self.inner.delete(CartKey::new(user_id, product_id)).await
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: String) -> Result<usize, CartError> {
        let removed = self
            .inner
            .delete_where(Filter::new(move |e: &CartEntry| e.key.user_id == user_id))
            .await?;
        info!(removed, "Cart cleared");
        Ok(removed)
    }
}
