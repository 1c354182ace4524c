use crate::actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart item not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Cart item already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CartError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(key) => CartError::NotFound(key),
            FrameworkError::AlreadyExists(key) => CartError::AlreadyExists(key),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
