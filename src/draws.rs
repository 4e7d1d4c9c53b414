//! Draw listing and retrieval.
//!
//! Loads the persisted snapshot and runs the core query engine. Used by the
//! `eedraws list`, `eedraws latest` and `eedraws get` commands; the HTTP
//! server shares [`load_snapshot`].

use anyhow::Result;

use express_entry_core::models::{DrawCollection, DrawView};
use express_entry_core::query::{self, DrawQuery};
use express_entry_core::store::SnapshotStore;
use express_entry_core::DrawError;

use crate::config::Config;
use crate::storage::FileStore;

/// Load the snapshot, turning "never saved" into [`DrawError::MissingSnapshot`].
pub async fn load_snapshot(store: &dyn SnapshotStore) -> Result<DrawCollection> {
    match store.load().await? {
        Some(collection) => Ok(collection),
        None => Err(DrawError::MissingSnapshot.into()),
    }
}

/// CLI entry point for `eedraws list`.
pub async fn run_list(
    config: &Config,
    year: Option<String>,
    category: Option<String>,
    limit: Option<String>,
    json: bool,
) -> Result<()> {
    let query = DrawQuery::from_params(year.as_deref(), category.as_deref(), limit.as_deref())?;
    let collection = load_snapshot(&FileStore::from_config(config)).await?;
    let listing = query::list(&collection, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.draws.is_empty() {
        println!("No draws found.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<10}  {:>11}  {:>5}  {:<16}  {}",
        "ROUND", "DATE", "INVITATIONS", "CRS", "TYPE", "CATEGORY"
    );
    println!("{}", "-".repeat(72));
    for view in &listing.draws {
        println!(
            "{:>6}  {:<10}  {:>11}  {:>5}  {:<16}  {}",
            view.draw_number,
            view.date.as_deref().unwrap_or("-"),
            view.invitations_issued,
            view.minimum_crs,
            view.round_type.label(),
            view.category.map(|c| c.label()).unwrap_or("-"),
        );
    }
    println!();
    println!(
        "{} draw{} (snapshot updated {})",
        listing.count,
        if listing.count == 1 { "" } else { "s" },
        listing.last_updated.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(())
}

/// CLI entry point for `eedraws latest`.
pub async fn run_latest(config: &Config, json: bool) -> Result<()> {
    let collection = load_snapshot(&FileStore::from_config(config)).await?;
    let view = query::latest(&collection)?.to_view();
    print_draw(&view, json)
}

/// CLI entry point for `eedraws get <id>`.
pub async fn run_get(config: &Config, id: &str, json: bool) -> Result<()> {
    let collection = load_snapshot(&FileStore::from_config(config)).await?;
    let view = query::lookup(&collection, id)?.to_view();
    print_draw(&view, json)
}

fn print_draw(view: &DrawView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("--- Draw #{} ---", view.draw_number);
    println!("date:         {}", view.date.as_deref().unwrap_or("(unknown)"));
    println!("round type:   {}", view.round_type);
    println!(
        "category:     {}",
        view.category.map(|c| c.label()).unwrap_or("(none)")
    );
    println!("invitations:  {}", view.invitations_issued);
    println!("minimum CRS:  {}", view.minimum_crs);
    if let Some(ref notes) = view.notes {
        println!("notes:        {}", notes);
    }
    Ok(())
}
