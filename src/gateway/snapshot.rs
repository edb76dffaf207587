// Static snapshot tier.
// Loads a pre-generated data bundle once per gateway and writes new ones.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::store::write_text;
use crate::error::{GatewayError, Result};
use crate::github::{Profile, Release, Repository};

/// Where the static snapshot lives, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SnapshotSource {
    #[default]
    None,
    File(PathBuf),
    Url(String),
}

impl SnapshotSource {
    /// Interpret `location` as an http(s) URL or a file path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.is_empty() {
            SnapshotSource::None
        } else if location.starts_with("http://") || location.starts_with("https://") {
            SnapshotSource::Url(location.to_string())
        } else {
            SnapshotSource::File(PathBuf::from(location))
        }
    }
}

/// Pre-generated bundle of everything the gateway serves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSnapshot {
    pub profile: Option<Profile>,
    pub repos: Option<Vec<Repository>>,
    pub releases: Option<Vec<Release>>,
    /// Generation time in epoch milliseconds.
    #[serde(rename = "generatedAt")]
    pub generated_at: Option<i64>,
}

impl StaticSnapshot {
    /// Bundle freshly fetched data, stamped with the current time.
    pub fn new(profile: Profile, repos: Vec<Repository>, releases: Vec<Release>) -> Self {
        Self {
            profile: Some(profile),
            repos: Some(repos),
            releases: Some(releases),
            generated_at: Some(Utc::now().timestamp_millis()),
        }
    }

    /// Parse a snapshot document.
    ///
    /// The document must be a JSON object. Each section is decoded on its
    /// own; a section that is missing, `null`, or malformed is left empty
    /// without discarding the others.
    pub fn from_json(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let Value::Object(fields) = value else {
            return Err(GatewayError::Other(
                "snapshot is not a JSON object".to_string(),
            ));
        };

        Ok(Self {
            profile: section(&fields, "profile"),
            repos: section(&fields, "repos"),
            releases: section(&fields, "releases"),
            generated_at: fields.get("generatedAt").and_then(Value::as_i64),
        })
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at.and_then(DateTime::from_timestamp_millis)
    }

    /// Write the snapshot as pretty JSON, replacing any existing file atomically.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_text(path, &json)
    }
}

fn section<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key).filter(|v| !v.is_null())?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(section = key, "ignoring malformed snapshot section: {}", err);
            None
        }
    }
}

/// Loads the snapshot on first use and remembers the outcome, hit or miss,
/// for the rest of its lifetime.
pub struct SnapshotLoader {
    source: SnapshotSource,
    http: Client,
    loaded: OnceCell<Option<StaticSnapshot>>,
}

impl SnapshotLoader {
    pub fn new(source: SnapshotSource, http: Client) -> Self {
        Self {
            source,
            http,
            loaded: OnceCell::new(),
        }
    }

    /// The snapshot, if one could be loaded. Only the first call does any I/O.
    pub async fn get(&self) -> Option<&StaticSnapshot> {
        self.loaded.get_or_init(|| self.load()).await.as_ref()
    }

    async fn load(&self) -> Option<StaticSnapshot> {
        let contents = match &self.source {
            SnapshotSource::None => return None,
            SnapshotSource::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(contents) => contents,
                Err(err) => {
                    debug!(path = %path.display(), "no static snapshot: {}", err);
                    return None;
                }
            },
            SnapshotSource::Url(url) => match self.fetch_remote(url).await {
                Ok(contents) => contents,
                Err(err) => {
                    debug!(url = %url, "no static snapshot: {}", err);
                    return None;
                }
            },
        };

        match StaticSnapshot::from_json(&contents) {
            Ok(snapshot) => {
                info!(
                    generated_at = ?snapshot.generated_at(),
                    "using static snapshot"
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!("ignoring unreadable static snapshot: {}", err);
                None
            }
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
