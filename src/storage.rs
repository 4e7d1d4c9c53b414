//! File-backed snapshot store.
//!
//! The snapshot is a single pretty-printed JSON document. Each save writes
//! its own uniquely named temporary file next to the target and renames it
//! over the target, so readers see either the old snapshot or the new one
//! and overlapping saves never share a temporary file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use express_entry_core::models::DrawCollection;
use express_entry_core::store::SnapshotStore;

use crate::config::Config;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn write_replace(dir: &Path, target: &Path, json: &str) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target)
        .with_context(|| format!("Failed to replace snapshot: {}", target.display()))?;
    Ok(())
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self) -> Result<Option<DrawCollection>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))
            }
        };

        let collection: DrawCollection = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;
        Ok(Some(collection))
    }

    async fn save(&self, collection: &DrawCollection) -> Result<()> {
        let dir = self.dir();
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(collection)?;
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || write_replace(&dir, &target, &json)).await??;
        Ok(())
    }
}
