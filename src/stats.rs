//! Snapshot statistics report.
//!
//! Prints the core [`statistics`] summary for the whole snapshot or a single
//! year. Used by `eedraws stats`; the HTTP server returns the same summary
//! as JSON.

use anyhow::Result;

use express_entry_core::stats::{statistics, GroupStats, StatsSummary};
use std::collections::BTreeMap;

use crate::config::Config;
use crate::draws::load_snapshot;
use crate::storage::FileStore;

/// Run the stats command: load the snapshot and print a summary.
pub async fn run_stats(config: &Config, year: Option<String>, json: bool) -> Result<()> {
    let collection = load_snapshot(&FileStore::from_config(config)).await?;
    let summary = statistics(&collection, year.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(s: &StatsSummary) {
    println!("Express Entry Draws — Statistics");
    println!("================================");
    if let Some(ref f) = s.filter {
        println!("  Year:        {}", f.year);
    }
    println!();
    println!("  Draws:       {}", s.total_draws);
    println!("  Invitations: {}", s.total_invitations);
    println!(
        "  Date range:  {} → {}",
        s.date_range.earliest.as_deref().unwrap_or("?"),
        s.date_range.latest.as_deref().unwrap_or("?")
    );
    println!();
    println!(
        "  CRS:         avg {}  median {}  min {}  max {}",
        s.crs.average, s.crs.median, s.crs.minimum, s.crs.maximum
    );
    println!(
        "  Invitations: avg {}  min {}  max {}",
        s.invitations.average, s.invitations.minimum, s.invitations.maximum
    );

    print_groups("By round type", &s.by_round_type);
    print_groups("By category", &s.by_category);

    println!();
    println!("  By year:");
    println!("  {:<24} {:>6} {:>12}", "YEAR", "DRAWS", "INVITATIONS");
    println!("  {}", "-".repeat(44));
    for (year, y) in &s.by_year {
        println!("  {:<24} {:>6} {:>12}", year, y.count, y.total_invitations);
    }
    println!();
}

fn print_groups(title: &str, groups: &BTreeMap<String, GroupStats>) {
    println!();
    println!("  {}:", title);
    println!(
        "  {:<24} {:>6} {:>12} {:>8}",
        "GROUP", "DRAWS", "INVITATIONS", "AVG CRS"
    );
    println!("  {}", "-".repeat(53));
    for (label, g) in groups {
        println!(
            "  {:<24} {:>6} {:>12} {:>8}",
            label, g.count, g.total_invitations, g.avg_crs
        );
    }
}
