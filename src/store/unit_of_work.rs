use tracing::{debug, warn};

use crate::actor_framework::{Entity, Table};
use crate::domain::{Order, Product};
use crate::order_actor::OrderError;
use crate::product_actor::{ProductAction, ProductActionResult};

/// Writes staged against the store's tables.
///
/// Staged rows are private copies. The tables are untouched until
/// [`UnitOfWork::commit`]; [`UnitOfWork::rollback`] or dropping the unit
/// discards every staged write.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl UnitOfWork {
    pub fn begin() -> Self {
        Self::default()
    }

    /// Takes `quantity` units off the staged copy of a product. A product
    /// appearing on several lines is decremented cumulatively.
    pub fn decrement_stock(
        &mut self,
        products: &Table<Product>,
        product_id: &str,
        quantity: u32,
    ) -> Result<u32, OrderError> {
        let product = self.stage_product(products, product_id)?;
        match product.handle_action(ProductAction::DecrementStock(quantity))? {
            ProductActionResult::DecrementStock(remaining) => {
                debug!(product_id, quantity, remaining, "Stock decrement staged");
                Ok(remaining)
            }
            other => Err(OrderError::StorageError(format!(
                "unexpected stock result {other:?}"
            ))),
        }
    }

    pub fn insert_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn staged_rows(&self) -> usize {
        self.products.len() + self.orders.len()
    }

    /// Applies every staged write and returns how many rows were written.
    pub fn commit(self, products: &mut Table<Product>, orders: &mut Table<Order>) -> usize {
        let written = self.staged_rows();
        for product in self.products {
            products.put(product);
        }
        for order in self.orders {
            orders.put(order);
        }
        written
    }

    pub fn rollback(self, reason: &OrderError) {
        warn!(discarded = self.staged_rows(), error = %reason, "Unit of work rolled back");
    }

    fn stage_product(
        &mut self,
        products: &Table<Product>,
        product_id: &str,
    ) -> Result<&mut Product, OrderError> {
        let index = match self.products.iter().position(|p| p.id == product_id) {
            Some(index) => index,
            None => {
                let product = products
                    .get(product_id)
                    .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))?;
                self.products.push(product.clone());
                self.products.len() - 1
            }
        };
        Ok(&mut self.products[index])
    }
}
