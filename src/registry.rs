use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Feed {
    pub name: String,
    pub url: String,
}

impl Feed {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("feed index {index} is out of range (registry holds {count} feeds)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("feed registry needs at least one seed feed")]
    Empty,
}

/// Ordered list of known feeds. Index 0 is the default selection.
///
/// `append` does no validation; callers go through
/// [`crate::validation`] first.
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<Feed>,
}

impl FeedRegistry {
    pub fn new(seeds: Vec<Feed>) -> Result<Self, RegistryError> {
        if seeds.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { feeds: seeds })
    }

    pub fn count(&self) -> usize {
        self.feeds.len()
    }

    pub fn get(&self, index: usize) -> Result<&Feed, RegistryError> {
        self.feeds.get(index).ok_or(RegistryError::IndexOutOfRange {
            index,
            count: self.feeds.len(),
        })
    }

    pub fn append(&mut self, feed: Feed) {
        self.feeds.push(feed);
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.feeds.iter().any(|feed| feed.name == name)
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feed> {
        self.feeds.iter()
    }
}
