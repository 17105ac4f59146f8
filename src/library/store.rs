//! Owner of the live catalog.
//!
//! The catalog is rebuilt from disk as a whole and swapped in with a single
//! assignment. Readers hold an `Arc<Catalog>` snapshot, so they never see a
//! half-built catalog and a failed rebuild leaves the old one in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;

use super::catalog::Catalog;
use super::scan;

/// Loader that owns the live catalog
#[derive(Debug)]
pub struct CatalogStore {
    /// Root of the emote tree (`<root>/<provider>/<channel>/...`)
    root: PathBuf,

    /// Live catalog slot
    current: Arc<RwLock<Arc<Catalog>>>,
}

/// Read-only handle to the live catalog
#[derive(Debug, Clone)]
pub struct CatalogReader {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogStore {
    /// Create a store with an empty catalog
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: Arc::new(RwLock::new(Arc::new(Catalog::new()))),
        }
    }

    /// Root directory the catalog is loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebuild the catalog from disk and make it live.
    ///
    /// On error the previously loaded catalog stays live.
    pub fn load(&self) -> Result<Arc<Catalog>> {
        tracing::info!("Loading emotes from {}", self.root.display());
        let catalog = Arc::new(scan::build(&self.root)?);
        self.replace(catalog.clone());
        Ok(catalog)
    }

    /// Make `catalog` the live catalog
    pub fn replace(&self, catalog: Arc<Catalog>) {
        // The slot only ever holds a complete Arc, so a poisoned lock is still usable
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = catalog;
    }

    /// Snapshot of the live catalog
    pub fn current(&self) -> Arc<Catalog> {
        snapshot(&self.current)
    }

    /// Hand out a read-only handle for the rendering side
    pub fn reader(&self) -> CatalogReader {
        CatalogReader {
            current: self.current.clone(),
        }
    }
}

impl CatalogReader {
    /// Snapshot of the live catalog
    pub fn current(&self) -> Arc<Catalog> {
        snapshot(&self.current)
    }
}

fn snapshot(slot: &RwLock<Arc<Catalog>>) -> Arc<Catalog> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_store_is_empty() {
        let store = CatalogStore::new("/nonexistent");
        assert!(store.current().is_empty());
        assert!(store.reader().current().is_empty());
    }

    #[test]
    fn test_reader_sees_replacement() {
        let store = CatalogStore::new("/nonexistent");
        let reader = store.reader();
        let before = reader.current();

        let mut catalog = Catalog::new();
        catalog.insert("twitch", "alice", "pog", "pog.png");
        store.replace(Arc::new(catalog));

        assert!(before.is_empty());
        assert_eq!(reader.current().get("twitch", "alice", "pog"), Some("pog.png"));
    }

    #[test]
    fn test_load_from_disk() {
        let temp = TempDir::new().unwrap();
        let channel = temp.path().join("twitch").join("alice");
        std::fs::create_dir_all(&channel).unwrap();
        std::fs::write(channel.join("pog.png"), b"png").unwrap();

        let store = CatalogStore::new(temp.path());
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(store.current(), loaded);
    }
}
