use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use ghfolio::config::{DEFAULT_RELEASE_CONCURRENCY, DEFAULT_RELEASES_PER_REPO};
use ghfolio::github::GITHUB_API_BASE;
use ghfolio::{GatewayConfig, ReleaseMode, SnapshotSource};

#[derive(Parser)]
#[command(name = "ghfolio")]
#[command(about = "GitHub profile, repositories, and releases for portfolio sites")]
#[command(version)]
pub struct Cli {
    /// GitHub login whose data is served
    #[arg(long, env = "GITHUB_USER")]
    pub user: String,

    /// Token to raise the API rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
    pub api_url: String,

    /// Cache directory (defaults to the platform cache dir)
    #[arg(long, env = "GHFOLIO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Static snapshot file path or http(s) URL
    #[arg(long, env = "GHFOLIO_SNAPSHOT")]
    pub snapshot: Option<String>,

    /// Cache freshness window in minutes
    #[arg(long, default_value_t = 60)]
    pub ttl_minutes: u64,

    /// How releases are looked up per repository
    #[arg(long, value_enum, default_value_t = ReleaseModeArg::Latest)]
    pub release_mode: ReleaseModeArg,

    /// Releases fetched per repository in `recent` mode
    #[arg(long, default_value_t = DEFAULT_RELEASES_PER_REPO)]
    pub releases_per_repo: u32,

    /// Only check the N most recently updated repositories for releases
    #[arg(long)]
    pub release_repos: Option<usize>,

    /// Release lookups in flight at once
    #[arg(long, default_value_t = DEFAULT_RELEASE_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the user's profile
    Profile,
    /// Print the user's repositories
    Repos {
        /// Only the N most starred repositories
        #[arg(long)]
        top: Option<usize>,
    },
    /// Print recent releases across repositories
    Releases,
    /// Fetch everything live and write a static snapshot
    Snapshot {
        #[arg(long, short, default_value = "github-data.json")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReleaseModeArg {
    /// Latest release of each repository
    Latest,
    /// Several recent releases of each repository, drafts excluded
    Recent,
}

impl Cli {
    pub fn gateway_config(&self) -> GatewayConfig {
        let release_mode = match self.release_mode {
            ReleaseModeArg::Latest => ReleaseMode::Latest,
            ReleaseModeArg::Recent => ReleaseMode::Recent {
                per_repo: self.releases_per_repo,
            },
        };

        let mut config = GatewayConfig::new(&self.user)
            .with_api_base(&self.api_url)
            .with_token(self.token.clone())
            .with_ttl(Duration::from_secs(self.ttl_minutes * 60))
            .with_release_mode(release_mode)
            .with_release_concurrency(self.concurrency)
            .with_request_timeout(Duration::from_secs(self.timeout_secs));

        if self.no_cache {
            config = config.with_cache_dir(None);
        } else if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(Some(dir.clone()));
        }
        if let Some(snapshot) = &self.snapshot {
            config = config.with_snapshot(SnapshotSource::parse(snapshot));
        }
        if self.release_repos.is_some() {
            config = config.with_release_repo_limit(self.release_repos);
        }

        config
    }
}
