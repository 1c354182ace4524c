use crate::domain::Product;

/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Removes sold units from stock.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` when fewer units are available than requested.
    DecrementStock(u32),
    /// Counts one catalog page view.
    RecordView,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    /// Stock left after the decrement.
    DecrementStock(u32),
    RecordView(Product),
}
