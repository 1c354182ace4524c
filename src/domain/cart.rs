use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key of a cart row: one entry per (user, product).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CartKey {
    pub user_id: String,
    pub product_id: String,
}

impl CartKey {
    pub fn new(user_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
        }
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.product_id)
    }
}

/// A product sitting in a user's cart. Size and color are free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub key: CartKey,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CartCreate {
    pub key: CartKey,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartPatch {
    pub quantity: Option<u32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCart {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_quantity() -> u32 {
    1
}
