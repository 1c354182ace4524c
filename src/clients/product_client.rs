use tracing::{debug, instrument, warn};

use crate::actor_framework::{Filter, ResourceClient};
use crate::domain::{Language, Product, ProductCreate, ProductPatch, ProductView};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::store::StoreRequest;

/// Client for the product table of the commerce store.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product, StoreRequest>,
}

impl_client_methods!(ProductClient, Product, String, ProductError, product, products);

impl ProductClient {
    pub fn new(inner: ResourceClient<Product, StoreRequest>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name.en))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Fetches a product for its detail page and counts the view.
    #[instrument(skip(self))]
    pub async fn view_product(&self, id: String) -> Result<Product, ProductError> {
        match self.inner.perform_action(id, ProductAction::RecordView).await? {
            ProductActionResult::RecordView(product) => Ok(product),
            other => {
                warn!(result = ?other, "Unexpected action result");
                Err(ProductError::ActorCommunicationError(format!(
                    "unexpected result {other:?}"
                )))
            }
        }
    }

    /// Catalog listing in one language, oldest listing first.
    #[instrument(skip(self))]
    pub async fn catalog(
        &self,
        language: Language,
        category: Option<String>,
    ) -> Result<Vec<ProductView>, ProductError> {
        let filter = match category {
            Some(category) => {
                Filter::new(move |p: &Product| p.category_id.as_deref() == Some(category.as_str()))
            }
            None => Filter::all(),
        };
        let mut products = self.list_products(filter).await?;
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        debug!(count = products.len(), "Catalog listed");
        Ok(products.iter().map(|p| p.localized(language)).collect())
    }
}
