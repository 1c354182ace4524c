use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument};

use super::unit_of_work::UnitOfWork;
use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest, Response, Table};
use crate::domain::{Order, OrderCreate, Product};
use crate::order_actor::OrderError;

/// Messages served by the [`CommerceStore`].
#[derive(Debug)]
pub enum StoreRequest {
    Products(ResourceRequest<Product>),
    Orders(ResourceRequest<Order>),
    /// Decrements stock for every line and inserts the order as one unit.
    PlaceOrder {
        order: OrderCreate,
        respond_to: Response<Order, OrderError>,
    },
    /// Makes the next order transaction fail after its stock writes are staged.
    #[cfg(test)]
    InjectFault {
        message: String,
        respond_to: oneshot::Sender<()>,
    },
}

impl From<ResourceRequest<Product>> for StoreRequest {
    fn from(request: ResourceRequest<Product>) -> Self {
        StoreRequest::Products(request)
    }
}

impl From<ResourceRequest<Order>> for StoreRequest {
    fn from(request: ResourceRequest<Order>) -> Self {
        StoreRequest::Orders(request)
    }
}

/// Actor owning the product and order tables.
///
/// Requests are served one at a time, so a transaction sees no interleaved
/// writes between its stock check and its commit.
pub struct CommerceStore {
    receiver: mpsc::Receiver<StoreRequest>,
    products: Table<Product>,
    orders: Table<Order>,
    #[cfg(test)]
    pending_fault: Option<String>,
}

impl CommerceStore {
    pub fn new(
        buffer_size: usize,
        next_product_id: impl Fn() -> String + Send + Sync + 'static,
        next_order_id: impl Fn() -> String + Send + Sync + 'static,
    ) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            products: Table::new(next_product_id),
            orders: Table::new(next_order_id),
            #[cfg(test)]
            pending_fault: None,
        };
        (store, StoreClient::new(sender))
    }

    #[instrument(name = "commerce_store", skip(self))]
    pub async fn run(mut self) {
        info!("CommerceStore starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Products(request) => self.products.handle(request),
                StoreRequest::Orders(request) => self.orders.handle(request),
                StoreRequest::PlaceOrder { order, respond_to } => {
                    let _ = respond_to.send(self.place_order(order));
                }
                #[cfg(test)]
                StoreRequest::InjectFault { message, respond_to } => {
                    self.pending_fault = Some(message);
                    let _ = respond_to.send(());
                }
            }
        }
        info!(
            products = self.products.len(),
            orders = self.orders.len(),
            "CommerceStore stopped"
        );
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id, lines = order.lines.len()))]
    fn place_order(&mut self, order: OrderCreate) -> Result<Order, OrderError> {
        let mut unit = UnitOfWork::begin();
        match self.stage_order(&mut unit, order) {
            Ok(order) => {
                let written = unit.commit(&mut self.products, &mut self.orders);
                info!(order_id = %order.id, written, "Order transaction committed");
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Order transaction failed");
                unit.rollback(&e);
                Err(e)
            }
        }
    }

    /// Stock is re-checked here against the live table, whatever the caller
    /// validated earlier.
    fn stage_order(&mut self, unit: &mut UnitOfWork, order: OrderCreate) -> Result<Order, OrderError> {
        for line in &order.lines {
            unit.decrement_stock(&self.products, &line.product_id, line.quantity)?;
        }
        #[cfg(test)]
        if let Some(message) = self.pending_fault.take() {
            return Err(OrderError::StorageError(message));
        }

        let mut order = Order::from_create_params(self.orders.next_id()?, order)?;
        order.on_create()?;
        unit.insert_order(order.clone());
        Ok(order)
    }
}

/// Handle to the [`CommerceStore`]. Table clients built from it share the
/// store's channel.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    pub fn products(&self) -> ResourceClient<Product, StoreRequest> {
        ResourceClient::new(self.sender.clone())
    }

    pub fn orders(&self) -> ResourceClient<Order, StoreRequest> {
        ResourceClient::new(self.sender.clone())
    }

    pub async fn place_order(&self, order: OrderCreate) -> Result<Order, OrderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::PlaceOrder { order, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    #[cfg(test)]
    pub async fn inject_fault(&self, message: impl Into<String>) {
        let (respond_to, response) = oneshot::channel();
        let request = StoreRequest::InjectFault {
            message: message.into(),
            respond_to,
        };
        if self.sender.send(request).await.is_ok() {
            let _ = response.await;
        }
    }
}
