//! Typed clients the HTTP layer talks to. Each wraps one or more actor
//! handles and owns the orchestration that spans them.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use cart_client::CartClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;
