//! System orchestration: startup wiring, seeding, tracing and shutdown.

pub mod error;
pub mod seed;
pub mod storefront_system;
pub mod telemetry;

pub use error::*;
pub use storefront_system::*;
pub use telemetry::*;
