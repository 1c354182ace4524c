//! Account rows: users and their password-reset tokens.

pub mod entity;
pub mod error;

pub use entity::ResetTokenAction;
pub use error::*;
