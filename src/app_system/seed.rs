//! Startup data: a catalog file and the configured admin account.

use std::path::Path;
use tracing::{info, instrument};

use super::SystemError;
use crate::auth::AccountService;
use crate::clients::ProductClient;
use crate::config::AdminSeed;
use crate::domain::{ProductCreate, User};

/// The seed file is a JSON array of product create payloads.
pub fn parse_catalog(json: &str) -> Result<Vec<ProductCreate>, SystemError> {
    Ok(serde_json::from_str(json)?)
}

#[instrument(skip(products))]
pub async fn seed_catalog(products: &ProductClient, path: &Path) -> Result<usize, SystemError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&raw)?;
    let count = catalog.len();
    for params in catalog {
        products.create_product(params).await?;
    }
    info!(count, "Catalog seeded");
    Ok(count)
}

#[instrument(skip(accounts, admin), fields(username = %admin.username))]
pub async fn seed_admin(accounts: &AccountService, admin: &AdminSeed) -> Result<User, SystemError> {
    Ok(accounts
        .ensure_admin(&admin.username, &admin.email, admin.password.expose())
        .await?)
}
