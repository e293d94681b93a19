use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

use crate::cli::{utils::output_success, OutputFormat};

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;
    let status = response.status();
    let body: Value = response.json().await.context("health response was not JSON")?;

    if !status.is_success() {
        anyhow::bail!("{} reported {}: {}", url, status, body);
    }

    output_success(output_format, &format!("{} is healthy", base_url), body.get("data").cloned())
}
