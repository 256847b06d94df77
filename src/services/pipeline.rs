// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::config::FetchConfig;
use crate::models::crawler::{CrawlResult, ROBOTS_DISALLOWED};
use crate::services::classifier::Classifier;
use crate::services::metadata::MetadataFetcher;
use crate::services::robots::RobotsCache;
use crate::services::topics::{extract_topics, DEFAULT_TOP_N};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Per-URL processing: robots gate, fetch, classification, topic extraction.
///
/// Both the HTTP service and the batch runner go through [`Pipeline::process`].
#[derive(Clone)]
pub struct Pipeline {
    robots: Arc<RobotsCache>,
    fetcher: MetadataFetcher,
    classifier: Classifier,
    top_n: usize,
}

impl Pipeline {
    pub fn new(robots: Arc<RobotsCache>, fetcher: MetadataFetcher, classifier: Classifier) -> Self {
        Self {
            robots,
            fetcher,
            classifier,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Number of topics attached to each successful result
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    /// Process one URL. Never fails: every problem ends up in `CrawlResult::error`.
    pub async fn process(
        &self,
        url: &str,
        config: &FetchConfig,
        use_statistical: bool,
    ) -> CrawlResult {
        guarded(url, self.run(url, config, use_statistical)).await
    }

    async fn run(&self, url: &str, config: &FetchConfig, use_statistical: bool) -> CrawlResult {
        if !self.robots.is_allowed(url, &config.user_agent).await {
            warn!("Disallowed by robots.txt: {}", url);
            return CrawlResult::failed(url, ROBOTS_DISALLOWED);
        }

        let metadata = match self
            .fetcher
            .fetch(url, &config.user_agent, config.timeout)
            .await
        {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Unable to fetch metadata for {}: {}", url, e);
                return CrawlResult::failed(url, e.to_string());
            }
        };

        let classification = self.classifier.classify(&metadata.body, use_statistical);
        let topics = extract_topics(&metadata.body, self.top_n);
        debug!(
            "Processed {}: classification={}, topics={:?}",
            url, classification, topics
        );

        CrawlResult::succeeded(url, metadata, classification, topics)
    }
}

/// Run `stage`, turning a panic into an error result for `url`
async fn guarded<F>(url: &str, stage: F) -> CrawlResult
where
    F: Future<Output = CrawlResult>,
{
    match AssertUnwindSafe(stage).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Failed to process {}: {}", url, message);
            CrawlResult::failed(url, message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected internal failure".to_string()
    }
}
