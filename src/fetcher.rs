use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    #[error("could not parse feed: {0}")]
    Parse(String),
}

/// Retrieves the entries behind a feed URL.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>, FetchError>;
}

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("FeedReader/1.0 (RSS Reader)")
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>, FetchError> {
        info!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        let entries = parse_entries(&bytes)?;
        info!("Parsed {} entries from {}", entries.len(), url);
        Ok(entries)
    }
}

/// Parses RSS or Atom bytes into entries, keeping document order.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<Entry>, FetchError> {
    let parsed = parser::parse(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    let entries = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let link = entry.links.first().map(|l| l.href.clone());

            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));

            let published = entry.published.or(entry.updated);

            Entry {
                title,
                link,
                summary,
                published,
            }
        })
        .collect();

    Ok(entries)
}
