use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn eedraws_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("eedraws");
    path
}

const FEED: &str = r#"{
  "classes": "table table-striped",
  "rounds": [
    { "drawNumber": "340", "drawDate": "2025-03-17", "drawSize": "536",
      "drawCRS": "736", "drawName": "Provincial Nominee Program" },
    { "drawNumber": "339", "drawDate": "2025-03-06", "drawSize": "4,500",
      "drawCRS": "410", "drawName": "French language proficiency (Version 1)" },
    { "drawNumber": "338", "drawDate": "2025-02-19", "drawSize": "6,500",
      "drawCRS": "428", "drawName": "French language proficiency (Version 1)" },
    { "drawNumber": "330", "drawDate": "2024-12-10", "drawSize": "5,000",
      "drawCRS": "520", "drawName": "Canadian Experience Class" },
    { "drawNumber": "n/a", "drawDate": "2024-01-01", "drawSize": "1",
      "drawCRS": "1", "drawName": "No Program Specified" }
  ]
}"#;

/// Returns (tempdir, config path, feed path, snapshot path).
fn setup_test_env() -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let feed_path = root.join("ee_rounds.json");
    fs::write(&feed_path, FEED).unwrap();

    let snapshot_path = root.join("data").join("draws.json");

    let config_content = format!(
        r#"[storage]
path = "{}"

[server]
bind = "127.0.0.1:7340"
"#,
        snapshot_path.display()
    );

    let config_path = config_dir.join("eedraws.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path, feed_path, snapshot_path)
}

fn run_eedraws(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = eedraws_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run eedraws binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn sync(config_path: &Path, feed_path: &Path) {
    let (stdout, stderr, success) = run_eedraws(
        config_path,
        &["sync", "--from-file", feed_path.to_str().unwrap()],
    );
    assert!(success, "sync failed: stdout={}, stderr={}", stdout, stderr);
}

fn json_output(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, success) = run_eedraws(config_path, args);
    assert!(success, "{:?} failed: stdout={}, stderr={}", args, stdout, stderr);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_sync_from_file() {
    let (_tmp, config_path, feed_path, snapshot_path) = setup_test_env();

    let (stdout, stderr, success) = run_eedraws(
        &config_path,
        &["sync", "--from-file", feed_path.to_str().unwrap()],
    );
    assert!(success, "sync failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("fetched: 5 draws"));
    assert!(stdout.contains("dropped: 1"));
    assert!(stdout.contains("saved: 4"));
    assert!(stdout.contains("ok"));

    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["totalDraws"], 4);
    assert_eq!(snapshot["draws"].as_array().unwrap().len(), 4);
}

#[test]
fn test_sync_dry_run_writes_nothing() {
    let (_tmp, config_path, feed_path, snapshot_path) = setup_test_env();

    let (stdout, _, success) = run_eedraws(
        &config_path,
        &["sync", "--dry-run", "--from-file", feed_path.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(stdout.contains("saved: 0"));
    assert!(!snapshot_path.exists());
}

#[test]
fn test_sync_invalid_payload_keeps_snapshot() {
    let (tmp, config_path, feed_path, snapshot_path) = setup_test_env();
    sync(&config_path, &feed_path);
    let before = fs::read_to_string(&snapshot_path).unwrap();

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, r#"{ "draws": [] }"#).unwrap();
    let (_, stderr, success) =
        run_eedraws(&config_path, &["sync", "--from-file", bad.to_str().unwrap()]);
    assert!(!success, "sync of a payload without rounds should fail");
    assert!(stderr.contains("invalid upstream format"), "stderr={}", stderr);

    assert_eq!(fs::read_to_string(&snapshot_path).unwrap(), before);
}

#[test]
fn test_list_before_sync_reports_missing_snapshot() {
    let (_tmp, config_path, _, _) = setup_test_env();

    let (_, stderr, success) = run_eedraws(&config_path, &["list"]);
    assert!(!success);
    assert!(stderr.contains("no snapshot"), "stderr={}", stderr);
}

#[test]
fn test_list_year_filter_sorted() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let body = json_output(&config_path, &["list", "--year", "2025", "--json"]);
    assert_eq!(body["count"], 3);
    let numbers: Vec<i64> = body["draws"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["drawNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![340, 339, 338]);
    assert_eq!(body["filters"]["year"], "2025");
}

#[test]
fn test_list_category_and_limit() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let body = json_output(
        &config_path,
        &["list", "--category", "french", "--limit", "1", "--json"],
    );
    assert_eq!(body["count"], 1);
    assert_eq!(body["draws"][0]["drawNumber"], 339);
    assert_eq!(body["draws"][0]["category"], "French-language");
    assert_eq!(body["draws"][0]["roundType"], "Category-based");
}

#[test]
fn test_list_deterministic() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let (out1, stderr1, ok1) = run_eedraws(&config_path, &["list", "--json"]);
    let (out2, stderr2, ok2) = run_eedraws(&config_path, &["list", "--json"]);
    assert!(ok1, "first list failed: {}", stderr1);
    assert!(ok2, "second list failed: {}", stderr2);
    assert_eq!(out1, out2);
    let body: serde_json::Value = serde_json::from_str(&out1).unwrap();
    assert_eq!(body["count"], 4);
}

#[test]
fn test_list_rejects_non_positive_limit() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let (_, stderr, success) = run_eedraws(&config_path, &["list", "--limit", "0"]);
    assert!(!success);
    assert!(stderr.contains("limit"), "stderr={}", stderr);
}

#[test]
fn test_latest() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let body = json_output(&config_path, &["latest", "--json"]);
    assert_eq!(body["drawNumber"], 340);
    assert_eq!(body["roundType"], "Program-specific");
    assert_eq!(body["category"], "PNP");
    assert_eq!(body["year"], "2025");
}

#[test]
fn test_get_draw() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let (stdout, _, success) = run_eedraws(&config_path, &["get", "330"]);
    assert!(success);
    assert!(stdout.contains("Draw #330"));
    assert!(stdout.contains("Canadian Experience Class"));
}

#[test]
fn test_get_invalid_and_missing() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let (_, stderr, success) = run_eedraws(&config_path, &["get", "abc"]);
    assert!(!success);
    assert!(stderr.contains("invalid draw number"), "stderr={}", stderr);

    let (_, stderr, success) = run_eedraws(&config_path, &["get", "999"]);
    assert!(!success);
    assert!(stderr.contains("not found"), "stderr={}", stderr);
}

#[test]
fn test_stats_matches_listing() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let stats = json_output(&config_path, &["stats", "--json"]);
    let listing = json_output(&config_path, &["list", "--json"]);
    assert_eq!(stats["totalDraws"], listing["count"]);
    assert_eq!(stats["totalInvitations"], 16536);
    assert_eq!(stats["crs"]["minimum"], 410);
    assert_eq!(stats["crs"]["maximum"], 736);
    assert_eq!(stats["crs"]["median"], 474);
    assert_eq!(stats["byCategory"]["French-language"]["count"], 2);
    assert_eq!(stats["dateRange"]["earliest"], "2024-12-10");
    assert_eq!(stats["dateRange"]["latest"], "2025-03-17");
    assert!(stats["filter"].is_null());
}

#[test]
fn test_stats_unknown_year_is_no_data() {
    let (_tmp, config_path, feed_path, _) = setup_test_env();
    sync(&config_path, &feed_path);

    let (_, stderr, success) = run_eedraws(&config_path, &["stats", "--year", "1999"]);
    assert!(!success);
    assert!(stderr.contains("no data"), "stderr={}", stderr);

    let (stdout, _, success) = run_eedraws(&config_path, &["stats", "--year", "2024"]);
    assert!(success);
    assert!(stdout.contains("Year:        2024"));
}
