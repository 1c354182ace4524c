//! Cart rows keyed by (user, product).

pub mod entity;
pub mod error;

pub use entity::CartAction;
pub use error::*;
