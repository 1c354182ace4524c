use chrono::Utc;

use super::error::CartError;
use crate::actor_framework::Entity;
use crate::domain::{CartCreate, CartEntry, CartKey, CartPatch};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds units to an existing entry; returns the new quantity.
    AddQuantity(u32),
}

impl Entity for CartEntry {
    const NAME: &'static str = "cart";
    type Id = CartKey;
    type CreateParams = CartCreate;
    type Patch = CartPatch;
    type Action = CartAction;
    type ActionResult = u32;
    type Error = CartError;

    fn id(&self) -> &CartKey {
        &self.key
    }

    fn natural_id(params: &CartCreate) -> Option<CartKey> {
        Some(params.key.clone())
    }

    fn from_create_params(key: CartKey, params: CartCreate) -> Result<Self, CartError> {
        if params.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        Ok(Self {
            key,
            quantity: params.quantity,
            size: params.size,
            color: params.color,
            added_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: CartPatch) -> Result<(), CartError> {
        if let Some(quantity) = patch.quantity {
            if quantity == 0 {
                return Err(CartError::InvalidQuantity(0));
            }
            self.quantity = quantity;
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CartAction) -> Result<u32, CartError> {
        match action {
            CartAction::AddQuantity(0) => Err(CartError::InvalidQuantity(0)),
            CartAction::AddQuantity(extra) => {
                self.quantity = self.quantity.saturating_add(extra);
                Ok(self.quantity)
            }
        }
    }
}
