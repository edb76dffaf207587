// Last-resort values served when no snapshot, cache, or live data is available.

use chrono::{TimeZone, Utc};

use crate::github::{Profile, Release, Repository};

/// Placeholder repositories: (name, description, language, stars, forks).
const REPOSITORIES: &[(&str, &str, &str, u64, u64)] = &[
    (
        "android_device_tree",
        "Device tree for building custom recoveries and ROMs",
        "Makefile",
        24,
        11,
    ),
    (
        "twrp_device_tree",
        "TWRP recovery device configuration",
        "C++",
        18,
        9,
    ),
    (
        "kernel_tools",
        "Scripts for building and packaging Android kernels",
        "Shell",
        7,
        2,
    ),
    (
        "portfolio",
        "Personal portfolio and blog",
        "TypeScript",
        3,
        0,
    ),
];

/// Canned profile for `login`.
pub fn profile(login: &str) -> Profile {
    Profile {
        login: login.to_string(),
        avatar_url: format!("https://github.com/{}.png", login),
        html_url: format!("https://github.com/{}", login),
        public_repos: REPOSITORIES.len() as u64,
        followers: 0,
        following: 0,
        bio: Some("Android Developer | Device Tree Engineer | TWRP Maintainer".to_string()),
        name: None,
    }
}

/// Small fixed list of representative repositories, most recently updated first.
pub fn repositories(login: &str) -> Vec<Repository> {
    REPOSITORIES
        .iter()
        .enumerate()
        .map(|(i, &(name, description, language, stars, forks))| Repository {
            id: i as u64 + 1,
            name: name.to_string(),
            description: Some(description.to_string()),
            html_url: format!("https://github.com/{}/{}", login, name),
            stargazers_count: stars,
            forks_count: forks,
            language: Some(language.to_string()),
            updated_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default()
                - chrono::Duration::days(i as i64),
            topics: Vec::new(),
            homepage: None,
        })
        .collect()
}

/// No releases are invented.
pub fn releases() -> Vec<Release> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_profile_uses_login() {
        let profile = profile("octo");
        assert_eq!(profile.login, "octo");
        assert_eq!(profile.html_url, "https://github.com/octo");
    }

    #[test]
    fn test_fallback_repositories_are_sorted_and_unique() {
        let repos = repositories("octo");
        assert_eq!(repos.len(), REPOSITORIES.len());
        assert!(repos.windows(2).all(|w| w[0].updated_at > w[1].updated_at));
        assert!(repos.windows(2).all(|w| w[0].id != w[1].id));
        assert!(repos[0].html_url.starts_with("https://github.com/octo/"));
    }
}
