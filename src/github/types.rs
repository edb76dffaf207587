// GitHub API response types.
// Defines structs for deserializing profile, repository, and release payloads.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile of a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub bio: Option<String>,
    pub name: Option<String>,
}

/// GitHub repository as listed under a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub homepage: Option<String>,
}

/// GitHub release, tagged with the repository it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub name: Option<String>,
    pub tag_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    /// Owning repository. Not part of the API payload; filled in during aggregation.
    #[serde(default)]
    pub repo_name: String,
}

impl Release {
    /// Date used for ordering: publish date, or creation date for unpublished releases.
    pub fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }

    /// Release title, falling back to the tag.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

/// Sort repositories by `updated_at`, newest first.
pub fn sort_by_updated_desc(repos: &mut [Repository]) {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Drop repositories whose id was already seen, keeping the first occurrence.
pub fn dedup_by_id(repos: &mut Vec<Repository>) {
    let mut seen = HashSet::new();
    repos.retain(|repo| seen.insert(repo.id));
}

/// Sort releases newest first. Stable, so equal dates keep their input order.
/// Releases without any date go last.
pub fn sort_by_published_desc(releases: &mut [Release]) {
    releases.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
}

/// The `n` most starred repositories, most recently updated first among ties.
pub fn top_by_stars(repos: &[Repository], n: usize) -> Vec<Repository> {
    let mut ranked = repos.to_vec();
    ranked.sort_by(|a, b| {
        b.stargazers_count
            .cmp(&a.stargazers_count)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    ranked.truncate(n);
    ranked
}
