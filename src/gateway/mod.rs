// GitHub data gateway.
// Resolves profile, repositories, and releases through snapshot, cache, live API, and fallback tiers.

pub mod fallback;
pub mod releases;
pub mod snapshot;

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use crate::cache::{CachePolicy, CacheStore, FileStore, MemoryStore};
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::github::{GitHubClient, Profile, Release, Repository, sort_by_updated_desc};
use crate::source::{DataSource, Resolved};

pub use releases::{ReleaseMode, Settled, settle};
pub use snapshot::{SnapshotLoader, SnapshotSource, StaticSnapshot};

/// Cache key for the profile.
pub const PROFILE_KEY: &str = "profile";
/// Cache key for the repository listing.
pub const REPOS_KEY: &str = "repos";
/// Cache key for the merged release list.
pub const RELEASES_KEY: &str = "releases";

/// Read-side gateway to one user's GitHub data.
///
/// Construct one per session and share it by reference. Every getter
/// resolves in the same order: static snapshot, fresh cache, live API,
/// stale cache, and finally a hardcoded value. Getters never fail.
pub struct Gateway {
    config: GatewayConfig,
    client: GitHubClient,
    cache: CachePolicy,
    snapshot: SnapshotLoader,
}

impl Gateway {
    /// Build a gateway with the store implied by `config.cache_dir`.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let store: Arc<dyn CacheStore> = match &config.cache_dir {
            Some(root) => Arc::new(FileStore::for_user(root, &config.login)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Build a gateway on an explicit cache store.
    pub fn with_store(config: GatewayConfig, store: Arc<dyn CacheStore>) -> Result<Self> {
        let client = GitHubClient::from_config(&config)?;
        let http = Client::builder().timeout(config.request_timeout).build()?;
        let snapshot = SnapshotLoader::new(config.snapshot.clone(), http);
        let cache = CachePolicy::new(store, config.ttl);

        Ok(Self {
            config,
            client,
            cache,
            snapshot,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// The user's profile.
    pub async fn profile(&self) -> Profile {
        self.resolve_profile().await.data
    }

    /// Every repository the user owns, most recently updated first.
    pub async fn repositories(&self) -> Vec<Repository> {
        self.resolve_repositories().await.data
    }

    /// Releases across the user's recently updated repositories, newest first.
    pub async fn latest_releases(&self) -> Vec<Release> {
        self.resolve_latest_releases().await.data
    }

    pub async fn resolve_profile(&self) -> Resolved<Profile> {
        if let Some(profile) = self.snapshot.get().await.and_then(|s| s.profile.clone()) {
            return Resolved::new(profile, DataSource::Snapshot);
        }

        let login = &self.config.login;
        match self
            .cache
            .fetch_with(PROFILE_KEY, || self.client.get_user(login))
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(login = %login, "profile unavailable, using fallback: {}", err);
                Resolved::new(fallback::profile(login), DataSource::Fallback)
            }
        }
    }

    pub async fn resolve_repositories(&self) -> Resolved<Vec<Repository>> {
        if let Some(repos) = self.snapshot.get().await.and_then(|s| s.repos.clone()) {
            return Resolved::new(repos, DataSource::Snapshot);
        }

        match self
            .cache
            .fetch_with(REPOS_KEY, || self.fetch_live_repositories())
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(login = %self.config.login, "repositories unavailable, using fallback: {}", err);
                Resolved::new(
                    fallback::repositories(&self.config.login),
                    DataSource::Fallback,
                )
            }
        }
    }

    pub async fn resolve_latest_releases(&self) -> Resolved<Vec<Release>> {
        if let Some(releases) = self.snapshot.get().await.and_then(|s| s.releases.clone()) {
            return Resolved::new(releases, DataSource::Snapshot);
        }

        match self
            .cache
            .fetch_with(RELEASES_KEY, || self.fetch_live_releases())
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(login = %self.config.login, "releases unavailable, using fallback: {}", err);
                Resolved::new(fallback::releases(), DataSource::Fallback)
            }
        }
    }

    /// Fetch all three datasets live, bypassing snapshot, cache, and fallbacks.
    /// Any failure fails the whole snapshot.
    pub async fn build_snapshot(&self) -> Result<StaticSnapshot> {
        let login = &self.config.login;
        info!(login = %login, "building static snapshot");

        let profile = self.client.get_user(login).await?;
        let repos = self.fetch_live_repositories().await?;
        let candidates = self.release_candidates(repos.clone());
        let releases = releases::aggregate(
            &self.client,
            login,
            &candidates,
            self.config.release_mode,
            self.config.release_concurrency,
        )
        .await
        .into_releases()?;

        info!(
            repos = repos.len(),
            releases = releases.len(),
            "snapshot ready"
        );
        Ok(StaticSnapshot::new(profile, repos, releases))
    }

    async fn fetch_live_repositories(&self) -> Result<Vec<Repository>> {
        self.client
            .get_all_user_repos(&self.config.login, self.config.per_page)
            .await
    }

    /// Aggregate releases over the candidate repositories. Fails when the
    /// repository listing cannot be resolved, when any lookup is rate limited,
    /// or when every lookup fails; the caller then keeps the previous entry.
    async fn fetch_live_releases(&self) -> Result<Vec<Release>> {
        let repos = match self.snapshot.get().await.and_then(|s| s.repos.clone()) {
            Some(repos) => repos,
            None => {
                self.cache
                    .fetch_with(REPOS_KEY, || self.fetch_live_repositories())
                    .await?
                    .data
            }
        };

        let candidates = self.release_candidates(repos);
        releases::aggregate(
            &self.client,
            &self.config.login,
            &candidates,
            self.config.release_mode,
            self.config.release_concurrency,
        )
        .await
        .into_releases()
    }

    /// Most recently updated repositories, bounded by the configured limit.
    fn release_candidates(&self, mut repos: Vec<Repository>) -> Vec<Repository> {
        sort_by_updated_desc(&mut repos);
        if let Some(limit) = self.config.release_repo_limit {
            repos.truncate(limit);
        }
        repos
    }
}
