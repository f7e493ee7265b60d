// src/source.rs
//! Outbound fetch seam for the status feed.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Default feed location; override via `feed-url` in the settings file.
pub const DEFAULT_FEED_URL: &str = "http://www.gatewaystatus.com/rss.cgi";

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// One fetch attempt, bounded by `timeout`. Any transport failure,
    /// timeout, or non-success status is an error; retry policy belongs to
    /// the scheduler (which has none — the next cycle is the retry).
    async fn fetch_raw(&self, timeout: Duration) -> Result<String>;

    fn name(&self) -> &'static str;
}

pub struct HttpFeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_raw(&self, timeout: Duration) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(timeout)
            .send()
            .await
            .context("status feed GET")?
            .error_for_status()
            .context("status feed non-2xx")?;
        resp.text().await.context("status feed body")
    }

    fn name(&self) -> &'static str {
        "gateway"
    }
}
