//! Product filter serialisation for the listing endpoint.
//!
//! The listing endpoint takes a compact query string rather than standard
//! repeated parameters:
//!
//! - manufacturers and their models share one `Mans` token, e.g.
//!   `Mans=10.101.102-20` selects models 101 and 102 of manufacturer 10 plus
//!   every model of manufacturer 20;
//! - categories are dot-joined in `Cats`;
//! - rent sub-types become one `Rent<Name>=1` flag each, in request order;
//! - `Page` is always present.
//!
//! Tokens are collected first and joined once, so no separator is ever left
//! dangling.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::cache::CatalogueCache;
use super::filter::ProductFilter;
use super::records::{ManufacturerId, ModelId};

/// What to do with filter ids the cache cannot place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedReferencePolicy {
    /// Leave unresolved ids out of the query.
    #[default]
    Drop,
    /// Fail the query with [`UnresolvedReferences`].
    Reject,
}

/// Filter ids that do not resolve against the cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "filter references unresolved ids: manufacturers [{}], models [{}]",
    join_ids(.manufacturers),
    join_ids(.models)
)]
pub struct UnresolvedReferences {
    /// Requested manufacturers missing from the cache.
    pub manufacturers: Vec<ManufacturerId>,
    /// Requested models that are not cached or whose manufacturer was not
    /// requested.
    pub models: Vec<ModelId>,
}

impl UnresolvedReferences {
    fn is_empty(&self) -> bool {
        self.manufacturers.is_empty() && self.models.is_empty()
    }
}

fn join_ids<T: fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encoded query for the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    encoded: String,
}

impl ProductQuery {
    /// Query parameters without the leading `?`.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.encoded)
    }
}

#[derive(Debug, Default)]
struct QueryTokens(Vec<String>);

impl QueryTokens {
    fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.0.push(format!("{key}={value}"));
    }

    fn push_some(&mut self, key: &str, value: Option<impl fmt::Display>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn push_joined<T: fmt::Display>(&mut self, key: &str, values: &[T], separator: &str) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        self.push(key, joined);
    }

    fn finish(self) -> ProductQuery {
        ProductQuery {
            encoded: self.0.join("&"),
        }
    }
}

impl ProductFilter {
    /// Serialise the filter into the listing endpoint's query encoding.
    ///
    /// Model ids are resolved to their manufacturers through `cache`, so the
    /// models of every requested manufacturer must already be loaded.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedReferences`] when `policy` is
    /// [`UnresolvedReferencePolicy::Reject`] and a requested manufacturer is
    /// not cached, or a requested model does not belong to a requested
    /// manufacturer.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalogue::domain::{
    ///     CatalogueCache, CategoryId, ProductFilter, UnresolvedReferencePolicy,
    /// };
    ///
    /// let filter = ProductFilter {
    ///     categories: vec![CategoryId::new(5), CategoryId::new(7)],
    ///     price_to: Some(20_000),
    ///     ..ProductFilter::default()
    /// };
    /// let query = filter
    ///     .build_query(&CatalogueCache::new(), UnresolvedReferencePolicy::Drop)
    ///     .expect("nothing to resolve");
    /// assert_eq!(query.to_string(), "?Cats=5.7&PriceTo=20000&Page=1");
    /// ```
    pub fn build_query(
        &self,
        cache: &CatalogueCache,
        policy: UnresolvedReferencePolicy,
    ) -> Result<ProductQuery, UnresolvedReferences> {
        let mut unresolved = UnresolvedReferences {
            manufacturers: Vec::new(),
            models: Vec::new(),
        };
        let mut tokens = QueryTokens::default();

        let groups = self.manufacturer_groups(cache, &mut unresolved);
        tokens.push_joined("Mans", &groups, "-");
        tokens.push_joined("Cats", &self.categories, ".");
        tokens.push_some("PriceFrom", self.price_from);
        tokens.push_some("PriceTo", self.price_to);
        tokens.push_some("CurrencyID", self.currency_id);
        tokens.push_some(
            "Period",
            self.period.map(|period| format!("{}h", period.as_hours())),
        );
        tokens.push_some(
            "ForRent",
            self.bargain.map(|bargain| u8::from(!bargain.is_sale())),
        );
        let mut emitted_rent_types = Vec::with_capacity(self.rent_types.len());
        for rent_type in &self.rent_types {
            if !emitted_rent_types.contains(rent_type) {
                emitted_rent_types.push(*rent_type);
                tokens.push(&format!("Rent{}", rent_type.name()), 1);
            }
        }
        tokens.push_some("SortOrder", self.sort_order);
        tokens.push("Page", self.page());

        if policy == UnresolvedReferencePolicy::Reject && !unresolved.is_empty() {
            return Err(unresolved);
        }
        Ok(tokens.finish())
    }

    /// Build one `<manId>[.<modelId>...]` group per requested manufacturer.
    fn manufacturer_groups(
        &self,
        cache: &CatalogueCache,
        unresolved: &mut UnresolvedReferences,
    ) -> Vec<String> {
        let mut groups: BTreeMap<ManufacturerId, Vec<ModelId>> = self
            .manufacturers
            .iter()
            .map(|id| (*id, Vec::new()))
            .collect();

        unresolved.manufacturers = groups
            .keys()
            .filter(|id| cache.manufacturer(**id).is_none())
            .copied()
            .collect();

        for model_id in &self.models {
            let owner = cache
                .manufacturer_of_model(*model_id)
                .and_then(|man_id| groups.get_mut(&man_id));
            match owner {
                Some(models) if !models.contains(model_id) => models.push(*model_id),
                Some(_) => {}
                None => unresolved.models.push(*model_id),
            }
        }

        groups
            .into_iter()
            .map(|(man_id, models)| {
                std::iter::once(man_id.to_string())
                    .chain(models.iter().map(ToString::to_string))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect()
    }
}
