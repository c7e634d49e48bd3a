//! Catalogue domain: records, filters, the session cache and the service
//! that keeps them in step with the remote catalogue.
//!
//! Public surface:
//! - CatalogueService (alias to `service::CatalogueService`): initialise,
//!   lazy model loading and product search.
//! - CatalogueCache (alias to `cache::CatalogueCache`): reference data
//!   cached for the session, with derived indexes.
//! - ProductFilter (alias to `filter::ProductFilter`): search criteria,
//!   serialised by `ProductFilter::build_query`.
//! - CatalogueError (alias to `error::CatalogueError`): operation failures.

pub mod cache;
pub mod error;
pub mod filter;
pub mod ports;
pub mod query;
pub mod records;
pub mod service;

pub use self::cache::{CatalogueCache, ModelLoadStatus};
pub use self::error::CatalogueError;
pub use self::filter::{BargainType, FilterParseError, Period, ProductFilter, RentType};
pub use self::query::{ProductQuery, UnresolvedReferencePolicy, UnresolvedReferences};
pub use self::records::{
    Category, CategoryId, CategoryType, Manufacturer, ManufacturerId, Model, ModelId, Product,
    ProductPage, VehicleClass,
};
pub use self::service::{CatalogueService, CatalogueServicePorts};
