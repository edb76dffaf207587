// GitHub API endpoint functions.
// Typed methods for the profile, repository listing, and release endpoints.

use tracing::debug;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Profile, Release, Repository, dedup_by_id, sort_by_updated_desc};

/// Largest page size the GitHub API accepts.
pub const MAX_PER_PAGE: u32 = 100;

impl GitHubClient {
    /// Get a user's public profile.
    pub async fn get_user(&self, login: &str) -> Result<Profile> {
        let response = self.get(&format!("/users/{}", login)).await?;
        let profile: Profile = response.json().await?;
        Ok(profile)
    }

    /// Get one page of repositories owned by a user, most recently updated first.
    pub async fn get_user_repos_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let params = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("type", "owner".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", login), &params)
            .await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }

    /// Get every repository owned by a user.
    ///
    /// Pages are requested in order until one comes back short. Any failed
    /// page fails the whole listing, since a partial list must not be cached
    /// as complete. The result is sorted by `updated_at` descending and
    /// contains each repository id once, however the pages shifted.
    pub async fn get_all_user_repos(&self, login: &str, per_page: u32) -> Result<Vec<Repository>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.get_user_repos_page(login, page, per_page).await?;
            let fetched = batch.len();
            repos.extend(batch);
            debug!(login, page, fetched, "fetched repository page");

            if fetched < per_page as usize {
                break;
            }
            page += 1;
        }

        sort_by_updated_desc(&mut repos);
        dedup_by_id(&mut repos);
        Ok(repos)
    }

    /// Get the latest published release of a repository. 404 means it has none.
    pub async fn get_latest_release(&self, login: &str, repo: &str) -> Result<Release> {
        let response = self
            .get(&format!("/repos/{}/{}/releases/latest", login, repo))
            .await?;
        let release: Release = response.json().await?;
        Ok(release)
    }

    /// Get the most recent releases of a repository, drafts included.
    pub async fn get_recent_releases(
        &self,
        login: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<Release>> {
        let params = [("per_page", per_page.clamp(1, MAX_PER_PAGE).to_string())];
        let response = self
            .get_with_params(&format!("/repos/{}/{}/releases", login, repo), &params)
            .await?;
        let releases: Vec<Release> = response.json().await?;
        Ok(releases)
    }
}
