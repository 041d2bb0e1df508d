use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::registry::{Feed, FeedRegistry};
use crate::validation::{check_name, check_name_format, check_url};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address the web server listens on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// HTTP timeout for feed requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Seed feeds, in menu order
    pub feeds: Vec<Feed>,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the session registry from the seed feeds.
    ///
    /// Seeds pass the same name and url rules as user submissions, checked
    /// in order, so a repeated name is reported against the earlier seed.
    pub fn seed_registry(&self) -> anyhow::Result<FeedRegistry> {
        let mut registry: Option<FeedRegistry> = None;

        for feed in &self.feeds {
            let checked = match registry.as_ref() {
                Some(registry) => check_name(&feed.name, registry),
                None => check_name_format(&feed.name),
            }
            .and_then(|_| check_url(&feed.url));
            checked.map_err(|e| anyhow::anyhow!("invalid seed feed '{}': {}", feed.name, e))?;

            match registry.as_mut() {
                Some(registry) => registry.append(feed.clone()),
                None => registry = Some(FeedRegistry::new(vec![feed.clone()])?),
            }
        }

        registry.ok_or_else(|| anyhow::anyhow!("config must list at least one feed"))
    }
}
