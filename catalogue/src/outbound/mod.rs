//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed `CatalogueSource` for the marketplace API.
//!
//! Adapters translate wire payloads into domain records and contain no
//! catalogue logic.

pub mod http;
