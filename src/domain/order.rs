use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// True when moving from `from` to `self` runs against the usual
    /// pending → processing → shipped → delivered progression. Cancelling is
    /// always forward; leaving `cancelled` never is.
    pub fn is_backwards_from(self, from: OrderStatus) -> bool {
        match (from, self) {
            (_, OrderStatus::Cancelled) => false,
            (OrderStatus::Cancelled, _) => true,
            _ => self.rank() < from.rank(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Free-form address snapshot copied into the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One line of a placed order. `unit_price` is the product price at order time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// `None` when the line total does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub shipping: ShippingInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn items_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
    }
}

/// A requested (product, quantity) pair as sent by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: u32,
}

impl LineRequest {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A validated line with its price captured.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Payload for creating a new order. Only the order manager builds one.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub lines: Vec<PendingLine>,
    pub total_price: Decimal,
    pub shipping: ShippingInfo,
}

/// Administrative status overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
