//! Ingestion pipeline orchestration.
//!
//! Coordinates one sync run: upstream payload → normalization → snapshot
//! replacement. A payload without a `rounds` array aborts the run before
//! anything is written, leaving the previous snapshot in place. Individual
//! bad entries are dropped and only counted.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use express_entry_core::normalize::normalize_payload;
use express_entry_core::store::SnapshotStore;

use crate::config::Config;
use crate::storage::FileStore;
use crate::upstream;

/// Summary of a sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Entries in the upstream payload.
    pub fetched: usize,
    /// Entries dropped during normalization.
    pub dropped: usize,
    /// Records written to the snapshot (0 on a dry run).
    pub saved: usize,
    pub timestamp: DateTime<Utc>,
}

/// CLI entry point for `eedraws sync`.
pub async fn run_sync(config: &Config, from_file: Option<&Path>, dry_run: bool) -> Result<()> {
    let (payload, source) = match from_file {
        Some(path) => (
            upstream::read_payload(path).await?,
            format!("file://{}", path.display()),
        ),
        None => (
            upstream::fetch_payload(&config.upstream).await?,
            config.upstream.url.clone(),
        ),
    };

    let store = FileStore::from_config(config);
    let report = sync_payload(&payload, &source, &store, dry_run).await?;

    if dry_run {
        println!("sync (dry-run)");
    } else {
        println!("sync");
    }
    println!("  fetched: {} draws", report.fetched);
    println!("  dropped: {}", report.dropped);
    println!("  saved: {}", report.saved);
    if !dry_run {
        println!("  snapshot: {}", store.path().display());
        println!("  last updated: {}", report.timestamp.to_rfc3339());
    }
    println!("ok");

    Ok(())
}

/// Normalize `payload` and replace the snapshot held by `store`.
///
/// With `dry_run`, the payload is normalized and counted but nothing is
/// saved.
pub async fn sync_payload(
    payload: &serde_json::Value,
    source: &str,
    store: &dyn SnapshotStore,
    dry_run: bool,
) -> Result<SyncReport> {
    let now = Utc::now();
    let outcome = normalize_payload(payload, source, now)?;

    info!(
        received = outcome.received,
        valid = outcome.collection.total_draws,
        "normalized upstream draws"
    );
    if outcome.dropped > 0 {
        warn!(dropped = outcome.dropped, "dropped invalid upstream entries");
    }

    let saved = if dry_run {
        0
    } else {
        store.save(&outcome.collection).await?;
        info!(saved = outcome.collection.total_draws, "snapshot replaced");
        outcome.collection.total_draws
    };

    Ok(SyncReport {
        fetched: outcome.received,
        dropped: outcome.dropped,
        saved,
        timestamp: now,
    })
}
