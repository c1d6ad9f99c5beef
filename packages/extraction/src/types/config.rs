//! Configuration types for the freshness cache and document sources.

use chrono::Duration;
use std::time::Duration as StdDuration;

/// Soft TTL used when none is configured.
pub const DEFAULT_SOFT_TTL_HOURS: i64 = 24;

/// Configuration for the freshness cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Window during which a cached result is trusted without asking the
    /// backing store for the current version.
    ///
    /// Applied twice: to the entry's `cached_at`, and to the snapshot
    /// version instant itself. Default: 24 hours.
    pub soft_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            soft_ttl: Duration::hours(DEFAULT_SOFT_TTL_HOURS),
        }
    }
}

impl CacheConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the soft TTL.
    pub fn with_soft_ttl(mut self, soft_ttl: Duration) -> Self {
        self.soft_ttl = soft_ttl;
        self
    }
}

/// Configuration for [`HttpDocumentSource`](crate::sources::HttpDocumentSource).
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL of the snapshot store, without trailing slash
    pub base_url: String,

    /// Per-request timeout. Default: 20 seconds.
    pub timeout: StdDuration,

    /// User agent sent to the snapshot store
    pub user_agent: String,
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: StdDuration::from_secs(20),
            user_agent: format!("affiliation-extraction/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
