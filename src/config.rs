// Gateway configuration.
// Plain settings struct with defaults; the CLI maps flags and env vars onto it.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{DEFAULT_TTL, default_cache_dir};
use crate::gateway::{ReleaseMode, SnapshotSource};
use crate::github::{GITHUB_API_BASE, MAX_PER_PAGE};

/// Releases fetched per repository in `ReleaseMode::Recent`.
pub const DEFAULT_RELEASES_PER_REPO: u32 = 5;
/// Most recently updated repositories checked for releases.
pub const DEFAULT_RELEASE_REPO_LIMIT: usize = 15;
/// Release lookups in flight at once.
pub const DEFAULT_RELEASE_CONCURRENCY: usize = 6;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Account whose data is served.
    pub login: String,
    /// REST API base URL.
    pub api_base: String,
    /// Optional bearer token. Raises the rate limit; never required.
    pub token: Option<String>,
    /// Root of the on-disk cache. `None` keeps the cache in memory.
    pub cache_dir: Option<PathBuf>,
    /// Freshness window for cache entries.
    pub ttl: Duration,
    pub snapshot: SnapshotSource,
    /// Repository listing page size.
    pub per_page: u32,
    pub release_mode: ReleaseMode,
    /// Only the first N repositories by `updated_at` are checked for releases.
    pub release_repo_limit: Option<usize>,
    pub release_concurrency: usize,
    pub request_timeout: Duration,
    /// Retries on 5xx responses.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl GatewayConfig {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
            cache_dir: default_cache_dir(),
            ttl: DEFAULT_TTL,
            snapshot: SnapshotSource::None,
            per_page: MAX_PER_PAGE,
            release_mode: ReleaseMode::Latest,
            release_repo_limit: Some(DEFAULT_RELEASE_REPO_LIMIT),
            release_concurrency: DEFAULT_RELEASE_CONCURRENCY,
            request_timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: Option<PathBuf>) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotSource) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }

    pub fn with_release_repo_limit(mut self, limit: Option<usize>) -> Self {
        self.release_repo_limit = limit;
        self
    }

    pub fn with_release_concurrency(mut self, concurrency: usize) -> Self {
        self.release_concurrency = concurrency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }
}
