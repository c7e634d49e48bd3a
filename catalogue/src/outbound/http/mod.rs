//! Marketplace HTTP adapters.
//!
//! This module provides a thin HTTP implementation of the `CatalogueSource`
//! port.

mod dto;
mod http_source;

pub(crate) use http_source::DEFAULT_USER_AGENT;
pub use http_source::{CatalogueEndpoints, CatalogueHttpSource};
