// Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ghfolio::cache::{CacheStore, CachedData, MemoryStore};
use ghfolio::{Gateway, GatewayConfig};
use serde::Serialize;
use serde_json::{Value, json};

pub const LOGIN: &str = "octo";

/// Config pointed at a mock server, with an in-memory cache and no retries.
pub fn config(base_url: &str) -> GatewayConfig {
    GatewayConfig::new(LOGIN)
        .with_api_base(base_url)
        .with_cache_dir(None)
        .with_retries(0, Duration::ZERO)
        .with_request_timeout(Duration::from_secs(5))
}

pub fn gateway(config: GatewayConfig) -> (Gateway, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let gateway = Gateway::with_store(config, store.clone()).expect("Failed to build gateway");
    (gateway, store)
}

/// Store `data` under `key` as if it had been cached `age` ago.
pub fn seed<T: Serialize>(store: &MemoryStore, key: &str, data: T, age: chrono::Duration) {
    let entry = CachedData {
        data,
        timestamp: Utc::now() - age,
    };
    store
        .write(key, &serde_json::to_string(&entry).unwrap())
        .unwrap();
}

pub fn profile_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 42,
        "avatar_url": "https://avatars.githubusercontent.com/u/42?v=4",
        "html_url": format!("https://github.com/{}", login),
        "public_repos": 237,
        "followers": 120,
        "following": 10,
        "bio": "Builds things",
        "name": "Octo Cat"
    })
}

pub fn repo_json(id: u64, name: &str, updated_at: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{}/{}", LOGIN, name),
        "description": null,
        "html_url": format!("https://github.com/{}/{}", LOGIN, name),
        "stargazers_count": id % 7,
        "forks_count": 0,
        "language": "Rust",
        "updated_at": updated_at.to_rfc3339(),
        "topics": ["cli"],
        "homepage": null
    })
}

/// `count` repositories with ids starting at `first_id`, updated one hour apart.
pub fn repo_page(first_id: u64, count: u64) -> Value {
    let start = Utc::now();
    Value::Array(
        (first_id..first_id + count)
            .map(|id| {
                repo_json(
                    id,
                    &format!("repo-{}", id),
                    start - chrono::Duration::hours(id as i64),
                )
            })
            .collect(),
    )
}

pub fn release_json(id: u64, tag: &str, published_at: &str, draft: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Release {}", tag),
        "tag_name": tag,
        "draft": draft,
        "prerelease": false,
        "created_at": published_at,
        "published_at": if draft { Value::Null } else { json!(published_at) },
        "html_url": format!("https://github.com/{}/releases/tag/{}", LOGIN, tag),
        "body": "Changelog"
    })
}
