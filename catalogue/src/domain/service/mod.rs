//! Catalogue orchestration service.
//!
//! The service owns the session cache and coordinates the source port, the
//! query builder and the sink port. Reference loads are de-duplicated with
//! one `OnceCell` per collection and one per manufacturer, so concurrent
//! callers share a single in-flight request and a successful load is never
//! repeated. A failed load leaves its cell empty; the next caller retries.
//!
//! Cache writes happen under a short-lived write lock that is never held
//! across an await point.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use futures_util::future::join_all;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::cache::CatalogueCache;
use super::error::CatalogueError;
use super::filter::ProductFilter;
use super::ports::{CatalogueSink, CatalogueSource};
use super::query::UnresolvedReferencePolicy;
use super::records::{
    Category, CategoryType, Manufacturer, ManufacturerId, Model, ProductPage, VehicleClass,
};

/// Driven ports the catalogue service talks to.
pub struct CatalogueServicePorts {
    /// Remote catalogue reads.
    pub source: Arc<dyn CatalogueSource>,
    /// Receiver of search results.
    pub sink: Arc<dyn CatalogueSink>,
}

/// Session-scoped catalogue: cache, lazy model loading and product search.
pub struct CatalogueService {
    source: Arc<dyn CatalogueSource>,
    sink: Arc<dyn CatalogueSink>,
    policy: UnresolvedReferencePolicy,
    cache: RwLock<CatalogueCache>,
    categories_loaded: OnceCell<()>,
    manufacturers_loaded: OnceCell<()>,
    model_loads: Mutex<HashMap<ManufacturerId, Arc<OnceCell<()>>>>,
}

impl CatalogueService {
    /// Build a service with an empty cache.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let service = CatalogueService::new(ports, UnresolvedReferencePolicy::Drop);
    /// service.initialise().await?;
    /// ```
    #[must_use]
    pub fn new(ports: CatalogueServicePorts, policy: UnresolvedReferencePolicy) -> Self {
        Self {
            source: ports.source,
            sink: ports.sink,
            policy,
            cache: RwLock::new(CatalogueCache::new()),
            categories_loaded: OnceCell::new(),
            manufacturers_loaded: OnceCell::new(),
            model_loads: Mutex::new(HashMap::new()),
        }
    }

    /// Load categories and manufacturers.
    ///
    /// Both loads run concurrently and independently: a failure in one does
    /// not stop the other from populating the cache. Each load succeeds at
    /// most once per service; later calls only retry the loads that failed.
    ///
    /// # Errors
    ///
    /// Returns the categories failure if that load failed, otherwise the
    /// manufacturers failure.
    pub async fn initialise(&self) -> Result<(), CatalogueError> {
        let (categories, manufacturers) = tokio::join!(
            self.categories_loaded
                .get_or_try_init(|| self.load_categories()),
            self.manufacturers_loaded
                .get_or_try_init(|| self.load_manufacturers()),
        );
        categories.and(manufacturers).map(|_| ())
    }

    /// Make sure the models of every listed manufacturer are cached.
    ///
    /// Manufacturers whose models are not loaded yet are fetched
    /// concurrently; the call returns once every fetch has finished.
    ///
    /// # Errors
    ///
    /// Returns the first failure in the order of the distinct ids. Models of
    /// manufacturers that loaded successfully stay cached.
    pub async fn ensure_models_loaded(
        &self,
        manufacturer_ids: &[ManufacturerId],
    ) -> Result<(), CatalogueError> {
        let mut distinct = manufacturer_ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        join_all(distinct.into_iter().map(|id| self.load_models_once(id)))
            .await
            .into_iter()
            .collect::<Result<Vec<()>, _>>()
            .map(|_| ())
    }

    /// Load the models of the listed manufacturers and send them to the sink.
    ///
    /// Models are grouped by manufacturer in the order the ids were given.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::ensure_models_loaded`]; the sink is not written.
    pub async fn load_models_for(
        &self,
        manufacturer_ids: &[ManufacturerId],
    ) -> Result<(), CatalogueError> {
        self.ensure_models_loaded(manufacturer_ids).await?;
        let models = self.read_cache(|cache| {
            let mut seen = HashSet::new();
            manufacturer_ids
                .iter()
                .filter(|id| seen.insert(**id))
                .flat_map(|id| cache.models_of(*id).cloned())
                .collect::<Vec<_>>()
        })?;
        debug!(count = models.len(), "forwarding models");
        self.sink.set_models(models);
        Ok(())
    }

    /// Run a product search and send the page to the sink.
    ///
    /// Models of the filter's manufacturers are loaded first so requested
    /// model ids can be matched to their manufacturers. On success the sink
    /// receives the items, the total count and the last page number.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::NetworkFailure`] or
    /// [`CatalogueError::DecodeFailure`] when a request fails, and
    /// [`CatalogueError::UnresolvedReference`] when the service rejects
    /// unresolved filter ids. The sink is not written on failure.
    pub async fn search(&self, filter: &ProductFilter) -> Result<(), CatalogueError> {
        self.ensure_models_loaded(&filter.manufacturers).await?;
        let query = self.read_cache(|cache| filter.build_query(cache, self.policy))??;

        debug!(%query, "searching products");
        let page = self.source.fetch_products(&query).await.map_err(|error| {
            warn!(%query, %error, "product search failed");
            CatalogueError::from(error)
        })?;

        let ProductPage {
            items,
            total,
            last_page,
        } = page;
        debug!(items = items.len(), total, last_page, "product page received");
        self.sink.set_products(items);
        self.sink.set_total_vehicles(total);
        self.sink.set_last_page(last_page);
        Ok(())
    }

    /// Search with no criteria: the first page of every listing.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::search`].
    pub async fn search_all(&self) -> Result<(), CatalogueError> {
        self.search(&ProductFilter::default()).await
    }

    /// Run `f` against a consistent view of the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::StateUnavailable`] if the cache lock is
    /// poisoned.
    pub fn read_cache<R>(
        &self,
        f: impl FnOnce(&CatalogueCache) -> R,
    ) -> Result<R, CatalogueError> {
        let cache = self
            .cache
            .read()
            .map_err(|_| CatalogueError::state_unavailable("catalogue cache lock poisoned"))?;
        Ok(f(&*cache))
    }

    /// Every cached category.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::read_cache`].
    pub fn all_categories(&self) -> Result<Vec<Category>, CatalogueError> {
        self.read_cache(|cache| cache.all_categories().cloned().collect())
    }

    /// Cached categories of one classification.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::read_cache`].
    pub fn categories_of_type(
        &self,
        category_type: impl Into<CategoryType>,
    ) -> Result<Vec<Category>, CatalogueError> {
        let category_type = category_type.into();
        self.read_cache(|cache| cache.categories_of_type(category_type).cloned().collect())
    }

    /// Every cached manufacturer.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::read_cache`].
    pub fn all_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogueError> {
        self.read_cache(|cache| cache.all_manufacturers().cloned().collect())
    }

    /// Cached manufacturers of one vehicle class.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::read_cache`].
    pub fn manufacturers_of_class(
        &self,
        class: VehicleClass,
    ) -> Result<Vec<Manufacturer>, CatalogueError> {
        self.read_cache(|cache| cache.manufacturers_of_class(class).cloned().collect())
    }

    /// Models cached for one manufacturer, without fetching.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::read_cache`].
    pub fn models_of(
        &self,
        manufacturer_id: ManufacturerId,
    ) -> Result<Vec<Model>, CatalogueError> {
        self.read_cache(|cache| cache.models_of(manufacturer_id).cloned().collect())
    }

    fn write_cache<R>(
        &self,
        f: impl FnOnce(&mut CatalogueCache) -> R,
    ) -> Result<R, CatalogueError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| CatalogueError::state_unavailable("catalogue cache lock poisoned"))?;
        Ok(f(&mut *cache))
    }

    async fn load_categories(&self) -> Result<(), CatalogueError> {
        let categories = self.source.fetch_categories().await.map_err(|error| {
            warn!(%error, "category load failed");
            CatalogueError::from(error)
        })?;
        let received = categories.len();
        let added = self.write_cache(|cache| {
            categories
                .into_iter()
                .filter(|category| cache.record_category(category.clone()))
                .count()
        })?;
        debug!(received, added, "categories cached");
        Ok(())
    }

    async fn load_manufacturers(&self) -> Result<(), CatalogueError> {
        let manufacturers = self.source.fetch_manufacturers().await.map_err(|error| {
            warn!(%error, "manufacturer load failed");
            CatalogueError::from(error)
        })?;
        let received = manufacturers.len();
        let added = self.write_cache(|cache| {
            manufacturers
                .into_iter()
                .filter(|manufacturer| cache.record_manufacturer(manufacturer.clone()))
                .count()
        })?;
        debug!(received, added, "manufacturers cached");
        Ok(())
    }

    async fn load_models_once(
        &self,
        manufacturer_id: ManufacturerId,
    ) -> Result<(), CatalogueError> {
        let cell = {
            let mut loads = self.model_loads.lock().map_err(|_| {
                CatalogueError::state_unavailable("model load registry lock poisoned")
            })?;
            Arc::clone(loads.entry(manufacturer_id).or_default())
        };
        cell.get_or_try_init(|| self.load_models(manufacturer_id))
            .await
            .map(|_| ())
    }

    async fn load_models(&self, manufacturer_id: ManufacturerId) -> Result<(), CatalogueError> {
        self.write_cache(|cache| cache.mark_models_loading(manufacturer_id))?;
        debug!(%manufacturer_id, "fetching models");

        match self.source.fetch_models(manufacturer_id).await {
            Ok(models) => {
                let received = models.len();
                let added =
                    self.write_cache(|cache| cache.complete_model_load(manufacturer_id, models))?;
                debug!(%manufacturer_id, received, added, "models cached");
                Ok(())
            }
            Err(error) => {
                warn!(%manufacturer_id, %error, "model load failed");
                self.write_cache(|cache| cache.abandon_model_load(manufacturer_id))?;
                Err(error.into())
            }
        }
    }
}
