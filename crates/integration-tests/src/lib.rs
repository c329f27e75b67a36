//! Integration tests for Supra.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p supra-integration-tests
//! ```
//!
//! Each test spins up an in-process mock of the upstream catalog endpoint
//! ([`MockCatalog`]) and points a [`CatalogStore`] at it through a
//! throwaway data directory, so the tests exercise the real HTTP fetch,
//! snapshot persistence, and query paths end to end without any external
//! service.
//!
//! # Test Categories
//!
//! - `catalog_fetch` - Fetch lifecycle: idempotence, single-flight, errors
//! - `catalog_rehydrate` - Durable snapshot rehydration
//! - `storefront_scenario` - The menu-to-cart walkthrough
//! - `cart_flow` - Cart persistence and degradation

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tempfile::TempDir;

use supra_catalog::{CatalogConfig, CatalogStore};

/// In-process mock of the upstream catalog endpoint.
///
/// Counts hits so tests can assert on network traffic, and can be flipped
/// into a failing mode that answers HTTP 500 with a server-side error
/// message.
pub struct MockCatalog {
    state: Arc<MockState>,
    /// Full URL of the mocked `/all-products` endpoint.
    pub url: String,
}

struct MockState {
    hits: AtomicUsize,
    failing: AtomicBool,
    payload: Mutex<Value>,
}

impl MockCatalog {
    /// Start the mock on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics when no local port can be bound; test-only code.
    pub async fn start(payload: Value) -> Self {
        let state = Arc::new(MockState {
            hits: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            payload: Mutex::new(payload),
        });

        let app = Router::new()
            .route("/all-products", get(serve_catalog))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock catalog");
        });

        Self {
            state,
            url: format!("http://{addr}/all-products"),
        }
    }

    /// Number of requests the endpoint has answered.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Toggle failure mode (HTTP 500 + `success: false`).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the served payload.
    ///
    /// # Panics
    ///
    /// Panics when the payload mutex is poisoned; test-only code.
    pub fn set_payload(&self, payload: Value) {
        *self.state.payload.lock().expect("payload lock") = payload;
    }
}

async fn serve_catalog(State(state): State<Arc<MockState>>) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "catalog unavailable"})),
        );
    }
    let payload = state.payload.lock().expect("payload lock").clone();
    (StatusCode::OK, Json(payload))
}

/// One test's worth of wiring: mock endpoint, data directory, config.
pub struct TestContext {
    pub mock: MockCatalog,
    pub dir: TempDir,
    pub config: CatalogConfig,
}

impl TestContext {
    /// Context serving the standard sample menu.
    pub async fn new() -> Self {
        Self::with_payload(sample_payload()).await
    }

    /// Context serving a custom payload.
    ///
    /// # Panics
    ///
    /// Panics when the temp directory cannot be created; test-only code.
    pub async fn with_payload(payload: Value) -> Self {
        let mock = MockCatalog::start(payload).await;
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CatalogConfig::new(&mock.url, dir.path());
        Self { mock, dir, config }
    }

    /// Open a store over this context's endpoint and data directory.
    #[must_use]
    pub fn store(&self) -> CatalogStore {
        CatalogStore::open(&self.config)
    }
}

/// The standard sample menu: two food items, one Estonian-only pastry, and
/// one alcoholic beverage.
#[must_use]
pub fn sample_payload() -> Value {
    json!({
        "success": true,
        "products": [
            {
                "_id": "p-khachapuri",
                "slug": "khachapuri",
                "price": 10,
                "title": {"en": "Khachapuri", "ru": "Хачапури"},
                "images": ["khachapuri.jpg"],
                "category": {"_id": "c-mains", "name": {"en": "Mains"}, "slug": "mains"},
                "subcategory": {
                    "_id": "s-baked", "name": {"en": "Baked"}, "slug": "baked",
                    "parentCategory": "c-mains"
                }
            },
            {
                "_id": "p-khinkali",
                "slug": "khinkali",
                "price": 8,
                "title": {"en": "Khinkali"},
                "images": ["khinkali.jpg"],
                "category": {"_id": "c-mains", "name": {"en": "Mains"}, "slug": "mains"},
                "subcategory": {
                    "_id": "s-dumplings", "name": {"en": "Dumplings"}, "slug": "dumplings",
                    "parentCategory": "c-mains"
                }
            },
            {
                "_id": "p-juustukook",
                "slug": "juustukook",
                "price": 6,
                "title": {"et": "Juustukook"},
                "category": {"_id": "c-desserts", "name": {"en": "Desserts"}, "slug": "desserts"},
                "subcategory": {
                    "_id": "s-baked", "name": {"en": "Baked"}, "slug": "baked",
                    "parentCategory": "c-desserts"
                }
            }
        ],
        "alkohols": [
            {
                "_id": "a-saperavi",
                "slug": "saperavi",
                "name": "Saperavi",
                "price": 20,
                "isAlcoholic": true,
                "degree": 13.5,
                "volume": "0.75L",
                "region": {"en": "Kakheti"},
                "color": {"en": "Red"},
                "category": {"_id": "c-wine", "name": {"en": "Wine"}, "slug": "wine"},
                "subcategory": {
                    "_id": "s-red-wine", "name": {"en": "Red wine"}, "slug": "red-wine",
                    "parentCategory": "c-wine"
                }
            }
        ]
    })
}
