// Release aggregation across repositories.
// Looks up releases per repository concurrently and merges them into one ordered list.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::{GatewayError, Result};
use crate::github::{GitHubClient, Release, Repository, sort_by_published_desc};

/// How releases are looked up for each repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// `GET /repos/{user}/{repo}/releases/latest`: at most one release per repository.
    #[default]
    Latest,
    /// `GET /repos/{user}/{repo}/releases?per_page=N`: up to `per_repo` releases, drafts dropped.
    Recent { per_repo: u32 },
}

/// Outcome of every per-repository lookup, partitioned.
#[derive(Debug, Default)]
pub struct Settled {
    /// Releases from successful lookups, tagged with their repository.
    pub releases: Vec<Release>,
    /// Repositories that have no releases (404).
    pub without_releases: Vec<String>,
    /// Repositories whose lookup failed.
    pub failed: Vec<(String, GatewayError)>,
}

/// Partition lookup outcomes. A 404 means the repository has no releases.
pub fn settle(outcomes: Vec<(String, Result<Vec<Release>>)>) -> Settled {
    let mut settled = Settled::default();

    for (repo, outcome) in outcomes {
        match outcome {
            Ok(releases) => settled.releases.extend(releases),
            Err(err) if err.is_not_found() => settled.without_releases.push(repo),
            Err(err) => settled.failed.push((repo, err)),
        }
    }

    settled
}

impl Settled {
    /// The merged release list, or an error when it cannot be taken as complete:
    /// any lookup was rate limited, or every lookup failed. Other failures only
    /// drop their repository.
    pub fn into_releases(self) -> Result<Vec<Release>> {
        let Settled {
            releases,
            without_releases,
            failed,
        } = self;
        let all_failed = releases.is_empty() && without_releases.is_empty();
        let mut errors: Vec<GatewayError> = failed.into_iter().map(|(_, err)| err).collect();

        if let Some(pos) = errors.iter().position(GatewayError::is_rate_limited) {
            return Err(errors.swap_remove(pos));
        }
        if all_failed && !errors.is_empty() {
            return Err(errors.swap_remove(0));
        }

        Ok(releases)
    }
}

/// Look up releases for every repository, at most `concurrency` at a time.
///
/// A failing repository never stops the others. The settled releases are
/// ordered by publish date, newest first, whatever order the lookups
/// completed in.
pub async fn aggregate(
    client: &GitHubClient,
    login: &str,
    repos: &[Repository],
    mode: ReleaseMode,
    concurrency: usize,
) -> Settled {
    let outcomes: Vec<(String, Result<Vec<Release>>)> = stream::iter(repos)
        .map(|repo| async move {
            let outcome = lookup(client, login, &repo.name, mode).await;
            (repo.name.clone(), outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut settled = settle(outcomes);
    for (repo, err) in &settled.failed {
        warn!(repo = %repo, "release lookup failed: {}", err);
    }
    debug!(
        repos = repos.len(),
        releases = settled.releases.len(),
        without_releases = settled.without_releases.len(),
        failed = settled.failed.len(),
        "aggregated releases"
    );

    sort_by_published_desc(&mut settled.releases);
    settled
}

/// Releases of one repository, tagged with its name.
async fn lookup(
    client: &GitHubClient,
    login: &str,
    repo: &str,
    mode: ReleaseMode,
) -> Result<Vec<Release>> {
    let releases = match mode {
        ReleaseMode::Latest => vec![client.get_latest_release(login, repo).await?],
        ReleaseMode::Recent { per_repo } => client
            .get_recent_releases(login, repo, per_repo)
            .await?
            .into_iter()
            .filter(|release| !release.draft)
            .collect(),
    };

    Ok(releases
        .into_iter()
        .map(|mut release| {
            release.repo_name = repo.to_string();
            release
        })
        .collect())
}
