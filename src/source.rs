// Provenance of gateway results.
// Records which resolution tier produced a value.

use std::fmt;

/// Tier that produced a value, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Pre-generated static snapshot.
    Snapshot,
    /// Cache entry younger than the TTL; no network call made.
    FreshCache,
    /// Live API response, now cached.
    Live,
    /// Cache entry past its TTL, served because the live fetch failed.
    StaleCache,
    /// Hardcoded last-resort value.
    Fallback,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataSource::Snapshot => "snapshot",
            DataSource::FreshCache => "cache",
            DataSource::Live => "live",
            DataSource::StaleCache => "stale cache",
            DataSource::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

/// A value together with the tier it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Resolved<T> {
    pub fn new(data: T, source: DataSource) -> Self {
        Self { data, source }
    }
}
