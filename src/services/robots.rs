// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! robots.txt compliance.
//!
//! [`RobotsCache`] fetches `<origin>/robots.txt` once per origin and keeps the
//! parsed rules for the lifetime of the process. Anything that prevents a
//! policy from being determined resolves to "allowed" and is not cached, so
//! the next lookup for that origin tries again.

use chrono::{DateTime, Utc};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use texting_robots::Robot;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

/// Directives parsed from one origin's robots.txt
pub enum Directives {
    /// robots.txt is absent (4xx other than 401/403)
    AllowAll,
    /// robots.txt access is forbidden (401/403)
    DisallowAll,
    Rules(ParsedRobots),
}

/// Product token of a `User-Agent` value, the name robots.txt groups match on:
/// `SEOPOCCrawlerBot/0.1` becomes `seopoccrawlerbot`
pub fn product_token(user_agent: &str) -> String {
    user_agent
        .split('/')
        .next()
        .unwrap_or(user_agent)
        .trim()
        .to_lowercase()
}

/// A robots.txt body with one compiled matcher per product token.
/// Matchers for agents other than the fetching one are built on first use.
pub struct ParsedRobots {
    body: String,
    agents: Mutex<HashMap<String, Option<Arc<Robot>>>>,
}

impl ParsedRobots {
    pub fn parse(user_agent: &str, body: String) -> anyhow::Result<Self> {
        let agent = product_token(user_agent);
        let robot = Robot::new(&agent, body.as_bytes())?;

        Ok(Self {
            body,
            agents: Mutex::new(HashMap::from([(agent, Some(Arc::new(robot)))])),
        })
    }

    pub fn allows(&self, url: &str, user_agent: &str) -> bool {
        self.robot_for(&product_token(user_agent))
            .map_or(true, |robot| robot.allowed(url))
    }

    /// Number of agents with a compiled matcher
    pub fn agent_count(&self) -> usize {
        self.agents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `None` when the body cannot be parsed for `agent`, which allows everything
    fn robot_for(&self, agent: &str) -> Option<Arc<Robot>> {
        let mut agents = self.agents.lock().unwrap_or_else(PoisonError::into_inner);
        agents
            .entry(agent.to_string())
            .or_insert_with(|| match Robot::new(agent, self.body.as_bytes()) {
                Ok(robot) => Some(Arc::new(robot)),
                Err(e) => {
                    warn!("Failed to evaluate robots.txt for agent {}: {}", agent, e);
                    None
                }
            })
            .clone()
    }
}

/// Cached robots policy for a single origin
pub struct RobotsRuleSet {
    pub origin: String,
    pub directives: Directives,
    pub fetched_at: DateTime<Utc>,
}

impl RobotsRuleSet {
    /// Whether `user_agent` may fetch `url` under this rule set
    pub fn allows(&self, url: &str, user_agent: &str) -> bool {
        match &self.directives {
            Directives::AllowAll => true,
            Directives::DisallowAll => false,
            Directives::Rules(parsed) => parsed.allows(url, user_agent),
        }
    }
}

/// Origin-keyed robots.txt cache shared by every pipeline run
pub struct RobotsCache {
    cache: RwLock<HashMap<String, Arc<RobotsRuleSet>>>,
    client: Client,
    timeout: Duration,
}

impl Default for RobotsCache {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl RobotsCache {
    pub fn new(client: Client) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            client,
            timeout: DEFAULT_ROBOTS_TIMEOUT,
        }
    }

    /// Bound each robots.txt request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract the origin (scheme://host[:port]) from a URL
    pub fn origin_of(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        Some(match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        })
    }

    /// Check whether `user_agent` may fetch `url`.
    ///
    /// Returns `true` when the rules allow it, and also when robots.txt
    /// cannot be retrieved or parsed, or when the URL has no origin.
    pub async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        let Some(origin) = Self::origin_of(url) else {
            warn!("Could not derive origin from URL, allowing: {}", url);
            return true;
        };

        let Some(rules) = self.rules_for(&origin, user_agent).await else {
            return true;
        };

        let allowed = rules.allows(url, user_agent);
        if !allowed {
            info!("robots.txt disallows {} for user-agent '{}'", url, user_agent);
        }
        allowed
    }

    /// Get the cached rule set for `origin`, fetching it on first use.
    /// `None` means the policy could not be determined.
    pub async fn rules_for(&self, origin: &str, user_agent: &str) -> Option<Arc<RobotsRuleSet>> {
        if let Some(rules) = self.cache.read().await.get(origin) {
            return Some(rules.clone());
        }

        // Fetch outside the lock; concurrent first lookups may both fetch
        let directives = self.fetch_directives(origin, user_agent).await?;
        let fetched = Arc::new(RobotsRuleSet {
            origin: origin.to_string(),
            directives,
            fetched_at: Utc::now(),
        });

        let mut cache = self.cache.write().await;
        let rules = cache.entry(origin.to_string()).or_insert(fetched);
        Some(rules.clone())
    }

    /// Number of origins with a cached policy
    pub async fn cache_size(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn fetch_directives(&self, origin: &str, user_agent: &str) -> Option<Directives> {
        let robots_url = format!("{}/robots.txt", origin);
        debug!("Fetching robots.txt from: {}", robots_url);

        let response = match self
            .client
            .get(&robots_url)
            .header(USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch robots.txt for {}: {}", origin, e);
                return None;
            }
        };

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            info!("robots.txt for {} is forbidden ({}), disallowing all", origin, status);
            return Some(Directives::DisallowAll);
        }
        if status.is_client_error() {
            debug!("No robots.txt for {} ({})", origin, status);
            return Some(Directives::AllowAll);
        }
        if !status.is_success() {
            warn!("Failed to fetch robots.txt for {}: HTTP {}", origin, status);
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read robots.txt body for {}: {}", origin, e);
                return None;
            }
        };

        let size = body.len();
        match ParsedRobots::parse(user_agent, body) {
            Ok(parsed) => {
                info!("Fetched robots.txt for {} ({} bytes)", origin, size);
                Some(Directives::Rules(parsed))
            }
            Err(e) => {
                warn!("Failed to parse robots.txt for {}: {}", origin, e);
                None
            }
        }
    }
}
