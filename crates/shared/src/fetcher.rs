use anyhow::{Context, Result};
use reqwest::Client;

use crate::website::Website;

/// Some sites serve reduced or blocked pages to unknown clients, so the
/// fetcher identifies itself as a desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) \
Chrome/117.0.0.0 Safari/537.36";

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Single GET, no retries. Transport errors and non-success statuses
    /// propagate to the caller and abort the request in progress.
    pub async fn fetch(&self, url: &str) -> Result<Website> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error fetching {}: {}", url, status);
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(Website::from_html(url, &html))
    }
}
