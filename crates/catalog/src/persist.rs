//! Durable JSON snapshots for the catalog and the cart.
//!
//! Two independent keyed snapshots live under the configured data
//! directory: the raw catalog payload with its fetch timestamp, and the
//! cart line list. Persistence is best-effort by contract: when the
//! directory is unwritable or a snapshot is corrupt, the store and cart
//! keep working in memory and the failure is only logged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cart::CartLine;
use crate::payload::RawCatalogPayload;

const CATALOG_SNAPSHOT: &str = "catalog.json";
const CART_SNAPSHOT: &str = "cart.json";

/// Internal persistence failure; never surfaced past this module.
#[derive(Debug, Error)]
enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted catalog snapshot: the raw payload plus its fetch stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub payload: RawCatalogPayload,
    pub fetched_at: DateTime<Utc>,
}

/// Filesystem-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load the catalog snapshot, if a readable one exists.
    #[must_use]
    pub fn load_catalog(&self) -> Option<CatalogSnapshot> {
        self.load(CATALOG_SNAPSHOT)
    }

    /// Persist the catalog snapshot. Failures are logged and swallowed.
    pub fn save_catalog(&self, snapshot: &CatalogSnapshot) {
        self.save(CATALOG_SNAPSHOT, snapshot);
    }

    /// Load the cart snapshot, if a readable one exists.
    #[must_use]
    pub fn load_cart(&self) -> Option<Vec<CartLine>> {
        self.load(CART_SNAPSHOT)
    }

    /// Persist the cart lines. Failures are logged and swallowed.
    pub fn save_cart(&self, lines: &[CartLine]) {
        self.save(CART_SNAPSHOT, &lines);
    }

    /// Remove the cart snapshot. A missing file is not an error.
    pub fn clear_cart(&self) {
        let path = self.path(CART_SNAPSHOT);
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "failed to remove cart snapshot");
        }
    }

    fn load<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        let path = self.path(name);
        match read_json(&path) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read snapshot, starting fresh");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) {
        let path = self.path(name);
        if let Err(e) = write_json(&self.dir, &path, value) {
            warn!(path = %path.display(), error = %e, "failed to write snapshot, continuing in memory");
        } else {
            debug!(path = %path.display(), "snapshot written");
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

fn write_json<T: Serialize>(dir: &Path, path: &Path, value: &T) -> Result<(), StorageError> {
    fs::create_dir_all(dir)?;
    let text = serde_json::to_string(value)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_snapshot_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new(dir.path());
        assert!(store.load_catalog().is_none());

        let payload: RawCatalogPayload = serde_json::from_str(
            r#"{"success": true, "products": [{"_id": "p1", "slug": "khinkali", "price": 8}]}"#,
        )
        .expect("payload");
        let snapshot = CatalogSnapshot {
            payload,
            fetched_at: Utc::now(),
        };
        store.save_catalog(&snapshot);

        let loaded = store.load_catalog().expect("snapshot back");
        assert_eq!(loaded.payload.products.len(), 1);
        assert_eq!(loaded.fetched_at, snapshot.fetched_at);
    }

    #[test]
    fn test_corrupt_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CATALOG_SNAPSHOT), "{not json").expect("write");
        let store = SnapshotStore::new(dir.path());
        assert!(store.load_catalog().is_none());
    }

    #[test]
    fn test_unwritable_dir_is_swallowed() {
        // Pointing the store at a path occupied by a regular file makes
        // every write fail; saving must not panic.
        let dir = tempfile::tempdir().expect("tempdir");
        let blocked = dir.path().join("occupied");
        std::fs::write(&blocked, "file, not a directory").expect("write");
        let store = SnapshotStore::new(&blocked);
        store.save_cart(&[]);
        assert!(store.load_cart().is_none());
    }

    #[test]
    fn test_clear_cart_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new(dir.path());
        store.clear_cart();
        store.save_cart(&[]);
        store.clear_cart();
        store.clear_cart();
        assert!(store.load_cart().is_none());
    }
}
