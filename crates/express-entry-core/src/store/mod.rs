//! Snapshot storage abstraction.
//!
//! The [`SnapshotStore`] trait is the only way ingestion and queries reach
//! persisted state. Ingestion calls [`save`](SnapshotStore::save) once per
//! successful run; request handlers call [`load`](SnapshotStore::load) and
//! work on the owned copy they get back.
//!
//! Implementations must replace the snapshot atomically: a concurrent
//! `load` observes either the previous snapshot or the new one, never a
//! partial write.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::DrawCollection;

/// Abstract storage backend for draw snapshots.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](SnapshotStore::load) | Current snapshot, or `None` if nothing was ever saved |
/// | [`save`](SnapshotStore::save) | Replace the snapshot wholesale |
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the current snapshot.
    ///
    /// `Ok(None)` means no snapshot has ever been saved, which callers must
    /// report differently from a saved-but-empty collection.
    async fn load(&self) -> Result<Option<DrawCollection>>;

    /// Replace the stored snapshot with `collection`.
    async fn save(&self, collection: &DrawCollection) -> Result<()>;
}
