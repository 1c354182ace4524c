//! Products and orders behind a single actor, so an order and the stock it
//! consumes are written together or not at all.

mod commerce_store;
mod unit_of_work;

pub use commerce_store::{CommerceStore, StoreClient, StoreRequest};
