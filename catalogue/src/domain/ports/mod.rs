//! Domain ports for the catalogue boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_sink;
mod catalogue_source;

#[cfg(test)]
pub use catalogue_sink::MockCatalogueSink;
pub use catalogue_sink::CatalogueSink;
#[cfg(test)]
pub use catalogue_source::MockCatalogueSource;
pub use catalogue_source::{CatalogueSource, CatalogueSourceError};
