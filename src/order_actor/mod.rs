//! Order rows: creation from a validated payload and the admin status overwrite.

pub mod entity;
pub mod error;

pub use error::*;
