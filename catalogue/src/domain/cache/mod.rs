//! Session-scoped catalogue cache.
//!
//! Purpose: hold every category, manufacturer and model observed during a
//! session, plus the derived indexes the UI reads from. Entries are
//! write-once: an id already present is never replaced by a later fetch, and
//! nothing is evicted until the cache is dropped.
//!
//! Model loading is tracked per manufacturer with an explicit
//! [`ModelLoadStatus`] so "never fetched" and "fetched, no models" are
//! distinguishable.

use std::collections::{BTreeMap, HashMap};

use super::records::{
    Category, CategoryId, CategoryType, Manufacturer, ManufacturerId, Model, ModelId, VehicleClass,
};

/// Load state of one manufacturer's models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoadStatus {
    /// No successful fetch has happened yet.
    #[default]
    NotLoaded,
    /// A fetch is in flight.
    Loading,
    /// A fetch completed; the model list may be empty.
    Loaded,
}

#[derive(Debug, Default)]
struct ModelSlot {
    status: ModelLoadStatus,
    model_ids: Vec<ModelId>,
}

/// In-memory store of catalogue reference data.
#[derive(Debug, Default)]
pub struct CatalogueCache {
    categories: BTreeMap<CategoryId, Category>,
    manufacturers: BTreeMap<ManufacturerId, Manufacturer>,
    models: BTreeMap<ModelId, Model>,
    models_by_manufacturer: HashMap<ManufacturerId, ModelSlot>,
    manufacturers_by_class: HashMap<VehicleClass, Vec<ManufacturerId>>,
    categories_by_type: HashMap<CategoryType, Vec<CategoryId>>,
}

impl CatalogueCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a manufacturer's vehicle class.
    #[must_use]
    pub const fn classify(manufacturer: &Manufacturer) -> VehicleClass {
        manufacturer.vehicle_class()
    }

    /// Insert a category unless its id is already cached.
    ///
    /// Returns `true` when the category was new.
    pub fn record_category(&mut self, category: Category) -> bool {
        if self.categories.contains_key(&category.id) {
            return false;
        }
        self.categories_by_type
            .entry(category.category_type)
            .or_default()
            .push(category.id);
        self.categories.insert(category.id, category);
        true
    }

    /// Insert a manufacturer unless its id is already cached.
    ///
    /// A new manufacturer also gets an empty, not-yet-loaded model slot.
    /// Returns `true` when the manufacturer was new.
    pub fn record_manufacturer(&mut self, manufacturer: Manufacturer) -> bool {
        if self.manufacturers.contains_key(&manufacturer.id) {
            return false;
        }
        self.manufacturers_by_class
            .entry(manufacturer.vehicle_class())
            .or_default()
            .push(manufacturer.id);
        self.models_by_manufacturer
            .entry(manufacturer.id)
            .or_default();
        self.manufacturers.insert(manufacturer.id, manufacturer);
        true
    }

    /// Insert a model unless its id is already cached.
    ///
    /// The model is appended to its owning manufacturer's list even when the
    /// manufacturer itself has not been cached yet. Returns `true` when the
    /// model was new.
    pub fn record_model(&mut self, model: Model) -> bool {
        if self.models.contains_key(&model.id) {
            return false;
        }
        self.models_by_manufacturer
            .entry(model.manufacturer_id)
            .or_default()
            .model_ids
            .push(model.id);
        self.models.insert(model.id, model);
        true
    }

    /// Every cached category, ordered by id.
    pub fn all_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Cached categories of one classification, in insertion order.
    pub fn categories_of_type(
        &self,
        category_type: impl Into<CategoryType>,
    ) -> impl Iterator<Item = &Category> {
        self.categories_by_type
            .get(&category_type.into())
            .into_iter()
            .flatten()
            .filter_map(|id| self.categories.get(id))
    }

    /// Every cached manufacturer, ordered by id.
    pub fn all_manufacturers(&self) -> impl Iterator<Item = &Manufacturer> {
        self.manufacturers.values()
    }

    /// Cached manufacturers of one vehicle class, in insertion order.
    pub fn manufacturers_of_class(
        &self,
        class: VehicleClass,
    ) -> impl Iterator<Item = &Manufacturer> {
        self.manufacturers_by_class
            .get(&class)
            .into_iter()
            .flatten()
            .filter_map(|id| self.manufacturers.get(id))
    }

    /// Look up a cached manufacturer.
    #[must_use]
    pub fn manufacturer(&self, id: ManufacturerId) -> Option<&Manufacturer> {
        self.manufacturers.get(&id)
    }

    /// Look up a cached model.
    #[must_use]
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(&id)
    }

    /// Resolve the manufacturer owning a cached model.
    #[must_use]
    pub fn manufacturer_of_model(&self, id: ModelId) -> Option<ManufacturerId> {
        self.models.get(&id).map(|model| model.manufacturer_id)
    }

    /// Models cached for a manufacturer, in the order they were recorded.
    ///
    /// Never triggers a fetch; an unknown manufacturer yields nothing.
    pub fn models_of(&self, manufacturer_id: ManufacturerId) -> impl Iterator<Item = &Model> {
        self.models_by_manufacturer
            .get(&manufacturer_id)
            .into_iter()
            .flat_map(|slot| slot.model_ids.iter())
            .filter_map(|id| self.models.get(id))
    }

    /// Current model load state for a manufacturer.
    #[must_use]
    pub fn model_status(&self, manufacturer_id: ManufacturerId) -> ModelLoadStatus {
        self.models_by_manufacturer
            .get(&manufacturer_id)
            .map_or(ModelLoadStatus::NotLoaded, |slot| slot.status)
    }

    /// Whether a model fetch for this manufacturer has completed.
    #[must_use]
    pub fn has_loaded_models(&self, manufacturer_id: ManufacturerId) -> bool {
        self.model_status(manufacturer_id) == ModelLoadStatus::Loaded
    }

    /// Mark a manufacturer's models as being fetched.
    ///
    /// Has no effect once the models are loaded.
    pub fn mark_models_loading(&mut self, manufacturer_id: ManufacturerId) {
        let slot = self.models_by_manufacturer.entry(manufacturer_id).or_default();
        if slot.status != ModelLoadStatus::Loaded {
            slot.status = ModelLoadStatus::Loading;
        }
    }

    /// Record a completed model fetch and mark the manufacturer loaded.
    ///
    /// Returns how many of the models were new to the cache.
    pub fn complete_model_load(
        &mut self,
        manufacturer_id: ManufacturerId,
        models: impl IntoIterator<Item = Model>,
    ) -> usize {
        let mut added = 0;
        for model in models {
            if self.record_model(model) {
                added += 1;
            }
        }
        self.models_by_manufacturer
            .entry(manufacturer_id)
            .or_default()
            .status = ModelLoadStatus::Loaded;
        added
    }

    /// Return an in-flight manufacturer to `NotLoaded` after a failed fetch.
    pub fn abandon_model_load(&mut self, manufacturer_id: ManufacturerId) {
        if let Some(slot) = self.models_by_manufacturer.get_mut(&manufacturer_id) {
            if slot.status == ModelLoadStatus::Loading {
                slot.status = ModelLoadStatus::NotLoaded;
            }
        }
    }
}

#[cfg(test)]
mod tests;
