// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "SEOPOCCrawlerBot/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings applied to every page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Value of the `User-Agent` header, also used for robots.txt matching
    pub user_agent: String,
    /// Upper bound on a single page fetch
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}
