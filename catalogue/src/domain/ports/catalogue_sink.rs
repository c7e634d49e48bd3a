//! Port receiving the results of catalogue operations.
//!
//! The sink is owned by the embedding UI layer. Writes are one-way: the
//! catalogue service never reads anything back.

use crate::domain::records::{Model, Product};

/// Receiver for models, product listings and listing totals.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogueSink: Send + Sync {
    /// Replace the visible model list.
    fn set_models(&self, models: Vec<Model>);

    /// Replace the visible product listings.
    fn set_products(&self, products: Vec<Product>);

    /// Record the total number of vehicles matching the last search.
    fn set_total_vehicles(&self, total: u64);

    /// Record the last page number available for the last search.
    fn set_last_page(&self, last_page: u32);
}
