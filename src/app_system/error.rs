use thiserror::Error;

use crate::auth::AuthError;
use crate::product_actor::ProductError;

/// Failures while starting, seeding or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid seed file: {0}")]
    SeedFormat(#[from] serde_json::Error),
    #[error("Seeding products failed: {0}")]
    SeedProduct(#[from] ProductError),
    #[error("Seeding admin failed: {0}")]
    SeedAdmin(#[from] AuthError),
    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}
