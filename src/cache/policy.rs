// Caching policy wrapped around live fetches.
// Serves fresh entries, refreshes stale ones, and keeps stale data as a fallback.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::Result;
use crate::source::{DataSource, Resolved};

use super::store::{CacheStore, read_cached, write_cached};

/// TTL cache in front of an async fetcher.
///
/// Resolution order is fresh cache, then live data, then stale cache. Only
/// when the fetch fails and nothing was ever cached does the error reach the
/// caller. Entries are never deleted; age only decides whether they are
/// served before or after trying the network.
#[derive(Clone)]
pub struct CachePolicy {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachePolicy {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Resolve `key` through the cache, calling `fetcher` when the entry is missing or stale.
    pub async fn fetch_with<T, F, Fut>(&self, key: &str, fetcher: F) -> Result<Resolved<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cached = match read_cached::<T>(self.store.as_ref(), key) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, "ignoring unreadable cache entry: {}", err);
                None
            }
        };

        let stale = match cached {
            Some(entry) if entry.is_fresh(self.ttl) => {
                debug!(key, age_secs = entry.age().as_secs(), "serving fresh cache entry");
                return Ok(Resolved::new(entry.data, DataSource::FreshCache));
            }
            other => other,
        };

        match fetcher().await {
            Ok(data) => {
                if let Err(err) = write_cached(self.store.as_ref(), key, &data) {
                    warn!(key, "failed to persist cache entry: {}", err);
                }
                debug!(key, "cached live data");
                Ok(Resolved::new(data, DataSource::Live))
            }
            Err(err) => match stale {
                Some(entry) => {
                    warn!(
                        key,
                        age_secs = entry.age().as_secs(),
                        "live fetch failed, serving stale cache: {}",
                        err
                    );
                    Ok(Resolved::new(entry.data, DataSource::StaleCache))
                }
                None => Err(err),
            },
        }
    }
}
