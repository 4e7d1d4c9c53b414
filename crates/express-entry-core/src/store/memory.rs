//! In-memory [`SnapshotStore`] for tests and embedding.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::SnapshotStore;
use crate::models::DrawCollection;

/// Holds at most one snapshot behind a `RwLock`.
pub struct InMemoryStore {
    snapshot: RwLock<Option<DrawCollection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// A store that already holds `collection`.
    pub fn with_snapshot(collection: DrawCollection) -> Self {
        Self {
            snapshot: RwLock::new(Some(collection)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn load(&self) -> Result<Option<DrawCollection>> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        Ok(guard.clone())
    }

    async fn save(&self, collection: &DrawCollection) -> Result<()> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        *guard = Some(collection.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_missing_until_saved() {
        let store = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let empty = DrawCollection::new(Vec::new(), "src", Utc::now());
        store.save(&empty).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.source, "src");
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let store = InMemoryStore::with_snapshot(DrawCollection::new(Vec::new(), "old", Utc::now()));
        store
            .save(&DrawCollection::new(Vec::new(), "new", Utc::now()))
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().source, "new");
    }
}
