//! Client-side vehicle catalogue for an automotive marketplace.
//!
//! The crate caches manufacturers, models and categories fetched from the
//! marketplace API, serialises search filters into the listing endpoint's
//! compact query encoding and forwards result pages to a sink.

pub mod config;
pub mod domain;
pub mod outbound;
