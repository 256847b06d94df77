// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// Error message recorded when robots.txt forbids fetching a URL
pub const ROBOTS_DISALLOWED: &str = "Disallowed by robots.txt";

/// Column order of the tabular output
pub const CSV_COLUMNS: [&str; 9] = [
    "url",
    "title",
    "meta_description",
    "h1",
    "canonical",
    "body",
    "classification",
    "topics",
    "error",
];

/// Request to crawl a single URL through the HTTP service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// The URL to crawl
    pub url: String,
    /// Environment whose `<env>.ini` supplies the fetch configuration
    #[serde(default = "default_env")]
    pub env: String,
    /// Use the statistical classifier instead of the rule-based one
    #[serde(default, rename = "use_ml", alias = "use_statistical")]
    pub use_statistical: bool,
}

fn default_env() -> String {
    "dev".to_string()
}

/// Metadata extracted from a successfully fetched page.
/// Fields that were not present in the markup are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub canonical: String,
    pub body: String,
}

/// Result of processing one URL.
///
/// Either `error` is non-empty and every other field besides `url` is empty,
/// or `error` is empty and the metadata, classification and topics come from
/// a successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub canonical: String,
    pub body: String,
    pub classification: Option<String>,
    pub topics: Vec<String>,
    pub error: String,
}

impl CrawlResult {
    /// A result carrying only the URL and a failure reason
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: error.into(),
            ..Default::default()
        }
    }

    /// A successful result built from fetched metadata and its analysis
    pub fn succeeded(
        url: impl Into<String>,
        metadata: PageMetadata,
        classification: String,
        topics: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: metadata.title,
            meta_description: metadata.meta_description,
            h1: metadata.h1,
            canonical: metadata.canonical,
            body: metadata.body,
            classification: Some(classification),
            topics,
            error: String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Flattened, tabular form of a [`CrawlResult`].
/// Serde serializes the fields in declaration order, which matches [`CSV_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRow {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub canonical: String,
    pub body: String,
    pub classification: String,
    pub topics: String,
    pub error: String,
}

impl From<CrawlResult> for CrawlRow {
    fn from(result: CrawlResult) -> Self {
        Self {
            url: result.url,
            title: result.title,
            meta_description: result.meta_description,
            h1: result.h1,
            canonical: result.canonical,
            body: result.body,
            classification: result.classification.unwrap_or_default(),
            topics: result.topics.join(", "),
            error: result.error,
        }
    }
}
