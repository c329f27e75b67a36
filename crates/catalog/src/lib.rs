//! Supra catalog cache and query layer.
//!
//! This crate owns the data side of the Supra storefront: it fetches the
//! combined food + beverage catalog from a single upstream endpoint,
//! normalizes the two record shapes into one tagged item type, answers
//! filtered/searched/sorted/paged queries over the cached snapshot, and
//! manages the discounted shopping cart.
//!
//! # Architecture
//!
//! - One whole-payload cache generation: a fetch stores the raw payload and
//!   recomputes every derived collection before any reader can observe it.
//! - Pure query functions ([`query`]) bound to the current snapshot by
//!   [`CatalogStore`].
//! - Durable JSON snapshots for both the catalog and the cart, so a restart
//!   renders instantly from possibly-stale data and refreshes on demand.
//! - The cart applies a fixed discount when an item first enters it and
//!   migrates older persisted lines that predate the discount schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use supra_catalog::{CatalogConfig, CatalogQuery, CatalogStore};
//!
//! let config = CatalogConfig::from_env()?;
//! let store = CatalogStore::open(&config);
//!
//! store.initialize().await?;
//! let page = store.items_by_subcategory(Some(&sub_id), &CatalogQuery::default())?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod extract;
pub mod item;
pub mod payload;
pub mod persist;
pub mod query;
pub mod store;

pub use cart::{AddOutcome, Cart, CartLine, CheckoutLine, DISCOUNT_RATE, apply_discount};
pub use config::{CatalogConfig, ConfigError};
pub use error::CatalogError;
pub use item::{CatalogItem, Category, CategoryRef, ItemDetails, Subcategory, SubcategoryRef};
pub use payload::RawCatalogPayload;
pub use persist::{CatalogSnapshot, SnapshotStore};
pub use query::{Paginated, Pagination, SortDirection, SortField};
pub use store::{CatalogQuery, CatalogStore};
