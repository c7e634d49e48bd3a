//! Driven port for the remote catalogue service.
//!
//! The domain owns the request and response contracts so the catalogue
//! service stays transport-agnostic. Adapters decode wire payloads into the
//! domain records before returning them.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::query::ProductQuery;
use crate::domain::records::{Category, Manufacturer, ManufacturerId, Model, ProductPage};

define_port_error! {
    /// Errors surfaced while calling the remote catalogue service.
    pub enum CatalogueSourceError {
        /// Network transport failed before a response arrived.
        Transport {
            /// Transport failure detail.
            message: String,
        } => "catalogue transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout {
            /// What timed out.
            message: String,
        } => "catalogue request timed out: {message}",
        /// The service answered with a non-success status.
        Status {
            /// HTTP status code.
            status: u16,
            /// Response body preview or reason phrase.
            message: String,
        } => "catalogue service returned status {status}: {message}",
        /// The response payload did not match the expected schema.
        Decode {
            /// Decoder detail.
            message: String,
        } => "catalogue response decode failed: {message}",
        /// The adapter refused to issue the request.
        InvalidRequest {
            /// Why the request was refused.
            message: String,
        } => "catalogue request invalid: {message}",
    }
}

impl CatalogueSourceError {
    /// Return whether this error means the payload was unreadable rather than
    /// the request failing in flight.
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Port for reading reference and listing data from the catalogue service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Fetch every manufacturer known to the service.
    async fn fetch_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogueSourceError>;

    /// Fetch the models owned by one manufacturer.
    async fn fetch_models(
        &self,
        manufacturer_id: ManufacturerId,
    ) -> Result<Vec<Model>, CatalogueSourceError>;

    /// Fetch every vehicle category.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogueSourceError>;

    /// Fetch one page of product listings for an encoded query.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use catalogue::domain::ports::CatalogueSource;
    /// use catalogue::domain::{CatalogueCache, ProductFilter, UnresolvedReferencePolicy};
    ///
    /// let query = ProductFilter::default()
    ///     .build_query(&CatalogueCache::new(), UnresolvedReferencePolicy::Drop)?;
    /// let page = source.fetch_products(&query).await?;
    /// assert!(page.last_page >= 1);
    /// ```
    async fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductPage, CatalogueSourceError>;
}
