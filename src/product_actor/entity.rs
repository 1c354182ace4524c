use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    const NAME: &'static str = "products";
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty English name or a negative price.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        if params.name.en.trim().is_empty() {
            return Err(ProductError::ValidationError("English name is required".to_string()));
        }
        if params.price < Decimal::ZERO {
            return Err(ProductError::ValidationError(format!("negative price {}", params.price)));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            stock: params.stock,
            category_id: params.category_id,
            sizes: params.sizes,
            colors: params.colors,
            images: params.images,
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an administrative edit. Values are taken as given; stock and
    /// price are only guarded when an order is placed.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(sizes) = patch.sizes {
            self.sizes = sizes;
        }
        if let Some(colors) = patch.colors {
            self.colors = colors;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Errors
    /// `DecrementStock` fails without touching the row when stock would go negative.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::DecrementStock(0) => Err(ProductError::InvalidQuantity(0)),
            ProductAction::DecrementStock(amount) => {
                let remaining = self.stock.checked_sub(amount).ok_or_else(|| {
                    ProductError::InsufficientStock {
                        product_id: self.id.clone(),
                        product_name: self.name.en.clone(),
                        requested: amount,
                        available: self.stock,
                    }
                })?;
                self.stock = remaining;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::DecrementStock(remaining))
            }
            ProductAction::RecordView => {
                self.views += 1;
                Ok(ProductActionResult::RecordView(self.clone()))
            }
        }
    }
}
