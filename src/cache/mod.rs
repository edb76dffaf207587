// Cache module for local caching of GitHub responses.
// Stores API results so repeat views stay fast and survive rate limiting.

pub mod paths;
pub mod policy;
pub mod store;

pub use paths::default_cache_dir;
pub use policy::CachePolicy;
pub use store::{
    CacheStore, CachedData, DEFAULT_TTL, FileStore, MemoryStore, read_cached, write_cached,
};
