//! Upstream IRCC feed access.
//!
//! Fetches the rounds JSON over HTTP, or reads a previously downloaded copy
//! from disk. Both return the raw payload; shape validation happens in the
//! normalizer.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::UpstreamConfig;

/// GET the upstream feed and parse it as JSON.
pub async fn fetch_payload(upstream: &UpstreamConfig) -> Result<serde_json::Value> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(upstream.timeout_secs))
        .build()?;

    info!(url = %upstream.url, "fetching draws from upstream");
    let resp = client
        .get(&upstream.url)
        .send()
        .await
        .with_context(|| format!("Failed to reach upstream: {}", upstream.url))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("upstream returned {}: {}", status, body);
    }

    let payload: serde_json::Value = resp
        .json()
        .await
        .with_context(|| "Upstream response is not valid JSON")?;
    Ok(payload)
}

/// Read a payload saved to disk.
pub async fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
    let payload = serde_json::from_str(&content)
        .with_context(|| format!("Payload file is not valid JSON: {}", path.display()))?;
    Ok(payload)
}
