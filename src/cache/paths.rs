// Cache path utilities.
// Constructs filesystem paths for per-user cache entries.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/ghfolio on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghfolio").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a user's cache directory.
pub fn user_dir(root: &Path, login: &str) -> PathBuf {
    root.join("users").join(sanitize_name(login))
}

/// Path to the file holding the entry for `key`.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("simple"), "simple");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("owner:name"), "owner_name");
    }

    #[test]
    fn test_cache_paths() {
        let root = Path::new("/tmp/ghfolio");

        let dir = user_dir(root, "octo");
        assert!(dir.ends_with("users/octo"));

        let entry = entry_path(&dir, "releases");
        assert!(entry.ends_with("users/octo/releases.json"));
    }
}
