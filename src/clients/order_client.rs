use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::actor_framework::{Filter, ResourceClient};
use crate::clients::ProductClient;
use crate::domain::{
    LineRequest, Order, OrderCreate, OrderStatus, OrderStatusUpdate, PendingLine, ShippingInfo,
};
use crate::order_actor::OrderError;
use crate::store::{StoreClient, StoreRequest};

/// Client for placing and querying orders.
///
/// Placing an order validates every line against the catalog first, then hands
/// the priced lines to the commerce store, which commits stock and order rows
/// as one unit.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order, StoreRequest>,
    store: StoreClient,
    product_client: ProductClient,
}

impl_client_methods!(OrderClient, Order, String, OrderError, order, orders);

impl OrderClient {
    pub fn new(store: StoreClient, product_client: ProductClient) -> Self {
        Self {
            inner: store.orders(),
            store,
            product_client,
        }
    }

    #[instrument(skip(self, lines, shipping), fields(lines = lines.len()))]
    pub async fn place_order(
        &self,
        user_id: String,
        lines: Vec<LineRequest>,
        shipping: ShippingInfo,
    ) -> Result<Order, OrderError> {
        info!("Processing place_order request");

        if lines.is_empty() {
            return Err(OrderError::ValidationError(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(line) = lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity for {} must be at least 1",
                line.product_id
            )));
        }

        // Step 1: Validate every line and price it at the current catalog price
        let mut total_price = Decimal::ZERO;
        let mut pending = Vec::with_capacity(lines.len());
        for line in lines {
            let product = match self.product_client.get_product(line.product_id.clone()).await {
                Ok(Some(product)) => product,
                Ok(None) => {
                    error!(product_id = %line.product_id, "Product not found");
                    return Err(OrderError::ProductNotFound(line.product_id));
                }
                Err(e) => {
                    error!(error = %e, "Product lookup failed");
                    return Err(e.into());
                }
            };
            if product.stock < line.quantity {
                warn!(
                    product_id = %product.id,
                    requested = line.quantity,
                    available = product.stock,
                    "Insufficient stock"
                );
                return Err(OrderError::InsufficientStock {
                    product_id: product.id,
                    product_name: product.name.en,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            total_price = product
                .price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|line_total| total_price.checked_add(line_total))
                .ok_or_else(|| {
                    error!(product_id = %product.id, "Order total overflows");
                    OrderError::ValidationError("order total overflows".to_string())
                })?;
            pending.push(PendingLine {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }
        info!(total = %total_price, "Order validated");

        // Step 2: Decrement stock and persist the order in one unit of work
        let order = self
            .store
            .place_order(OrderCreate {
                user_id,
                lines: pending,
                total_price,
                shipping,
            })
            .await
            .inspect_err(|e| error!(error = %e, "Order transaction failed"))?;

        info!(order_id = %order.id, "Order placed successfully");
        Ok(order)
    }

    /// A customer's own orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders_for_user(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .list_orders(Filter::new(move |o: &Order| o.user_id == user_id))
            .await?;
        newest_first(&mut orders);
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn list_all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_orders(Filter::all()).await?;
        newest_first(&mut orders);
        Ok(orders)
    }

    /// An order belonging to someone else is reported as missing.
    #[instrument(skip(self))]
    pub async fn get_order_for_user(&self, user_id: String, order_id: String) -> Result<Order, OrderError> {
        match self.get_order(order_id.clone()).await? {
            Some(order) if order.user_id == user_id => Ok(order),
            _ => Err(OrderError::NotFound(order_id)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: String, status: OrderStatus) -> Result<Order, OrderError> {
        let order = self.inner.update(order_id, OrderStatusUpdate { status }).await?;
        info!(order_id = %order.id, status = %order.status, "Order status updated");
        Ok(order)
    }
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}
