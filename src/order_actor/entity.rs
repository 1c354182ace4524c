use chrono::Utc;
use tracing::warn;

use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderItem, OrderStatus, OrderStatusUpdate};

impl Entity for Order {
    const NAME: &'static str = "orders";
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderStatusUpdate;
    type Action = ();
    type ActionResult = ();
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order with its items from a validated payload.
    ///
    /// # Notes
    /// The order is initialized with status `pending`; item ids are derived
    /// from the order id and the line position.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        let now = Utc::now();
        let items = params
            .lines
            .into_iter()
            .enumerate()
            .map(|(n, line)| OrderItem {
                id: format!("{id}-item-{}", n + 1),
                order_id: id.clone(),
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();
        Ok(Self {
            id,
            user_id: params.user_id,
            items,
            total_price: params.total_price,
            status: OrderStatus::Pending,
            shipping: params.shipping,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rejects orders that would break the stored invariants: at least one
    /// line, positive quantities, and a total equal to the sum of the lines.
    fn on_create(&mut self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::ValidationError("order has no line items".to_string()));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "line for {} has zero quantity",
                item.product_id
            )));
        }
        let Some(expected) = self.items_total() else {
            return Err(OrderError::ValidationError("order total overflows".to_string()));
        };
        if self.total_price != expected {
            return Err(OrderError::ValidationError(format!(
                "order total {} does not match line items {}",
                self.total_price, expected
            )));
        }
        Ok(())
    }

    /// Overwrites the status. Any transition is accepted; backwards ones are
    /// logged so manual overrides stay visible.
    fn on_update(&mut self, patch: OrderStatusUpdate) -> Result<(), OrderError> {
        if patch.status.is_backwards_from(self.status) {
            warn!(
                order_id = %self.id,
                from = %self.status,
                to = %patch.status,
                "Order status moved backwards"
            );
        }
        self.status = patch.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), OrderError> {
        Ok(())
    }
}
