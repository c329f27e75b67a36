//! The persistent catalog cache store.
//!
//! [`CatalogStore`] is the one service instance the rest of the system
//! talks to: it owns the HTTP client, the current payload generation with
//! its derived collections, and the durable snapshot. It is cheaply
//! cloneable via `Arc` and is meant to be created once by the composition
//! root rather than living as an ambient global.
//!
//! # Consistency
//!
//! A successful fetch stores the raw payload and recomputes every derived
//! collection under one write lock, so no reader ever observes a payload
//! without matching derived data. Overlapping fetches are collapsed by a
//! single-flight lock: late callers wait for the in-flight fetch and then
//! take the idempotent fast path instead of issuing their own request.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use supra_core::{CategoryId, Locale, SubcategoryId};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::extract;
use crate::item::{CatalogItem, Category, Subcategory};
use crate::payload::RawCatalogPayload;
use crate::persist::{CatalogSnapshot, SnapshotStore};
use crate::query::{self, Paginated, SortDirection, SortField};

/// Default page size for listing queries.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Parameters for a composed listing query.
///
/// Applied in fixed order: filter → search → sort → paginate.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    /// Substring to match against item names; empty means no search.
    pub search_term: String,
    /// Sort key; `None` keeps the catalog's default order.
    pub sort_field: Option<SortField>,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub per_page: u32,
    pub locale: Locale,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            locale: Locale::En,
        }
    }
}

/// Collections recomputed from the raw payload on every generation.
#[derive(Debug, Default)]
struct Derived {
    products: Vec<CatalogItem>,
    beverages: Vec<CatalogItem>,
    all_items: Vec<CatalogItem>,
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
}

impl Derived {
    fn compute(payload: &RawCatalogPayload) -> Self {
        Self {
            products: extract::products(payload),
            beverages: extract::beverages(payload),
            all_items: extract::all_items(payload),
            categories: extract::categories(payload),
            subcategories: extract::subcategories(payload),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    payload: Option<RawCatalogPayload>,
    is_loading: bool,
    is_initialized: bool,
    last_fetch: Option<DateTime<Utc>>,
    error: Option<String>,
    derived: Derived,
}

impl StoreState {
    fn is_ready(&self) -> bool {
        self.is_initialized && !self.is_loading && self.payload.is_some()
    }
}

struct CatalogStoreInner {
    client: reqwest::Client,
    endpoint: String,
    snapshots: SnapshotStore,
    state: RwLock<StoreState>,
    fetch_lock: Mutex<()>,
}

/// The catalog cache store.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

impl CatalogStore {
    /// Open the store, rehydrating any durable snapshot before the first
    /// network call so cached data renders instantly.
    #[must_use]
    pub fn open(config: &CatalogConfig) -> Self {
        let snapshots = SnapshotStore::new(config.data_dir.clone());
        let mut state = StoreState::default();
        if let Some(snapshot) = snapshots.load_catalog() {
            info!(fetched_at = %snapshot.fetched_at, "rehydrated catalog snapshot");
            state.derived = Derived::compute(&snapshot.payload);
            state.payload = Some(snapshot.payload);
            state.last_fetch = Some(snapshot.fetched_at);
            state.is_initialized = true;
        }

        Self {
            inner: Arc::new(CatalogStoreInner {
                client: reqwest::Client::new(),
                endpoint: config.catalog_url.clone(),
                snapshots,
                state: RwLock::new(state),
                fetch_lock: Mutex::new(()),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_payload(&self) -> Option<RawCatalogPayload> {
        let state = self.read();
        if state.is_initialized {
            state.payload.clone()
        } else {
            None
        }
    }

    // =========================================================================
    // Fetch lifecycle
    // =========================================================================

    /// Fetch the catalog payload.
    ///
    /// When the store is already initialized and `force` is false, the
    /// cached payload is returned without any network access. Otherwise
    /// one request is made; concurrent callers collapse onto it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on HTTP failure, an unparsable body, or an
    /// upstream-reported failure. Previously cached data stays visible.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_all(&self, force: bool) -> Result<RawCatalogPayload, CatalogError> {
        if !force && let Some(payload) = self.cached_payload() {
            debug!("returning cached catalog payload");
            return Ok(payload);
        }

        let _flight = self.inner.fetch_lock.lock().await;

        // Re-check under the lock: a caller that was waiting here joins the
        // fetch that just completed instead of issuing another request.
        if !force && let Some(payload) = self.cached_payload() {
            debug!("joined completed in-flight fetch");
            return Ok(payload);
        }

        {
            let mut state = self.write();
            state.is_loading = true;
            state.error = None;
        }

        match self.do_fetch().await {
            Ok(payload) => {
                let fetched_at = Utc::now();
                {
                    let mut state = self.write();
                    state.derived = Derived::compute(&payload);
                    state.payload = Some(payload.clone());
                    state.last_fetch = Some(fetched_at);
                    state.is_initialized = true;
                    state.is_loading = false;
                    state.error = None;
                }
                self.inner.snapshots.save_catalog(&CatalogSnapshot {
                    payload: payload.clone(),
                    fetched_at,
                });
                info!(
                    products = payload.products.len(),
                    beverages = payload.alkohols.len(),
                    "catalog fetched"
                );
                Ok(payload)
            }
            Err(e) => {
                {
                    let mut state = self.write();
                    state.is_loading = false;
                    state.error = Some(e.to_string());
                }
                error!(error = %e, "catalog fetch failed");
                Err(e)
            }
        }
    }

    async fn do_fetch(&self) -> Result<RawCatalogPayload, CatalogError> {
        debug!("fetching catalog");
        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .send()
            .await?;
        let status = response.status();

        // Get the body as text first for better error diagnostics.
        let text = response.text().await?;

        if !status.is_success() {
            // The endpoint reports failures in the payload's error field
            // even on error statuses; fall back to the status line.
            let message = serde_json::from_str::<RawCatalogPayload>(&text)
                .ok()
                .and_then(|p| p.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            warn!(status = %status, "catalog endpoint returned non-success status");
            return Err(CatalogError::Upstream(message));
        }

        let payload: RawCatalogPayload = serde_json::from_str(&text)?;
        if !payload.success {
            let message = payload
                .error
                .unwrap_or_else(|| "catalog fetch failed".to_string());
            return Err(CatalogError::Upstream(message));
        }
        Ok(payload)
    }

    /// Initialize the store.
    ///
    /// A no-op fetch-wise when already initialized (derived collections are
    /// recomputed to cover payloads rehydrated without them); otherwise
    /// performs the full fetch.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying fetch.
    pub async fn initialize(&self) -> Result<RawCatalogPayload, CatalogError> {
        let rehydrated = {
            let state = self.read();
            if state.is_initialized {
                state.payload.clone()
            } else {
                None
            }
        };
        if let Some(payload) = rehydrated {
            let mut state = self.write();
            state.derived = Derived::compute(&payload);
            return Ok(payload);
        }
        self.fetch_all(false).await
    }

    /// Force a re-fetch regardless of current state.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying fetch.
    pub async fn refresh(&self) -> Result<RawCatalogPayload, CatalogError> {
        self.fetch_all(true).await
    }

    /// True when the cached payload is older than `max_age`, or when
    /// nothing was ever fetched.
    #[must_use]
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.read()
            .last_fetch
            .is_none_or(|fetched| Utc::now() - fetched > max_age)
    }

    /// Refresh only when stale; otherwise return the cached payload
    /// without a network call.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying fetch.
    pub async fn refresh_if_stale(
        &self,
        max_age: Duration,
    ) -> Result<RawCatalogPayload, CatalogError> {
        if self.is_stale(max_age) {
            self.refresh().await
        } else {
            self.fetch_all(false).await
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// True when initialized, not mid-fetch, and holding a payload.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.read().is_ready()
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    /// Timestamp of the last successful fetch.
    #[must_use]
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.read().last_fetch
    }

    /// Message of the last failed fetch, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// All deduplicated categories. Empty when not ready.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let state = self.read();
        if state.is_ready() {
            state.derived.categories.clone()
        } else {
            Vec::new()
        }
    }

    /// All deduplicated subcategories. Empty when not ready.
    #[must_use]
    pub fn subcategories(&self) -> Vec<Subcategory> {
        let state = self.read();
        if state.is_ready() {
            state.derived.subcategories.clone()
        } else {
            Vec::new()
        }
    }

    /// Subcategories belonging to one category. Empty when not ready.
    #[must_use]
    pub fn subcategories_of(&self, category: &CategoryId) -> Vec<Subcategory> {
        let state = self.read();
        if !state.is_ready() {
            return Vec::new();
        }
        state
            .derived
            .subcategories
            .iter()
            .filter(|sub| sub.parent_category.as_ref() == Some(category))
            .cloned()
            .collect()
    }

    /// All normalized food items. Empty when not ready.
    #[must_use]
    pub fn products(&self) -> Vec<CatalogItem> {
        let state = self.read();
        if state.is_ready() {
            state.derived.products.clone()
        } else {
            Vec::new()
        }
    }

    /// All normalized beverages. Empty when not ready.
    #[must_use]
    pub fn beverages(&self) -> Vec<CatalogItem> {
        let state = self.read();
        if state.is_ready() {
            state.derived.beverages.clone()
        } else {
            Vec::new()
        }
    }

    /// The unified collection, products then beverages. Empty when not
    /// ready.
    #[must_use]
    pub fn all_items(&self) -> Vec<CatalogItem> {
        let state = self.read();
        if state.is_ready() {
            state.derived.all_items.clone()
        } else {
            Vec::new()
        }
    }

    /// Look an item up by slug.
    ///
    /// Products are scanned before beverages, so on a slug collision the
    /// product wins.
    #[must_use]
    pub fn item_by_slug(&self, slug: &str) -> Option<CatalogItem> {
        let state = self.read();
        if !state.is_ready() {
            return None;
        }
        state
            .derived
            .products
            .iter()
            .find(|item| item.slug == slug)
            .or_else(|| {
                state
                    .derived
                    .beverages
                    .iter()
                    .find(|item| item.slug == slug)
            })
            .cloned()
    }

    /// Composed listing query: filter → search → sort → paginate.
    ///
    /// Not-ready stores produce an empty page rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] when `query.per_page` is
    /// zero.
    pub fn items_by_subcategory(
        &self,
        subcategory: Option<&SubcategoryId>,
        query: &CatalogQuery,
    ) -> Result<Paginated<CatalogItem>, CatalogError> {
        let state = self.read();
        let source: &[CatalogItem] = if state.is_ready() {
            &state.derived.all_items
        } else {
            &[]
        };

        let filtered = query::filter_by_subcategory(source, subcategory);
        let searched = query::search_items(filtered, &query.search_term, query.locale);
        let sorted = match query.sort_field {
            Some(field) => {
                query::sort_items(searched, field, query.sort_direction, query.locale)
            }
            None => searched,
        };
        Ok(query::paginate_items(&sorted, query.page, query.per_page)?.cloned())
    }

    /// Unpaged search within one subcategory. Empty when not ready.
    #[must_use]
    pub fn search_in_subcategory(
        &self,
        subcategory: Option<&SubcategoryId>,
        term: &str,
        locale: Locale,
    ) -> Vec<CatalogItem> {
        let state = self.read();
        let source: &[CatalogItem] = if state.is_ready() {
            &state.derived.all_items
        } else {
            &[]
        };
        let filtered = query::filter_by_subcategory(source, subcategory);
        query::search_items(filtered, term, locale)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Snapshot store handle, shared with the cart.
    #[must_use]
    pub fn snapshots(&self) -> SnapshotStore {
        self.inner.snapshots.clone()
    }
}
