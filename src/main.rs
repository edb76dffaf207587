mod cli;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use ghfolio::github::top_by_stars;
use ghfolio::{Gateway, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway = Gateway::new(cli.gateway_config())?;

    match cli.command {
        Command::Profile => {
            let resolved = gateway.resolve_profile().await;
            info!(source = %resolved.source, "profile for @{}", resolved.data.login);
            print_json(&resolved.data)?;
        }
        Command::Repos { top } => {
            let resolved = gateway.resolve_repositories().await;
            info!(source = %resolved.source, "loaded {} repositories", resolved.data.len());
            match top {
                Some(n) => print_json(&top_by_stars(&resolved.data, n))?,
                None => print_json(&resolved.data)?,
            }
        }
        Command::Releases => {
            let resolved = gateway.resolve_latest_releases().await;
            info!(source = %resolved.source, "loaded {} releases", resolved.data.len());
            for release in &resolved.data {
                debug!(repo = %release.repo_name, "{}", release.display_name());
            }
            print_json(&resolved.data)?;
        }
        Command::Snapshot { output } => {
            let snapshot = gateway.build_snapshot().await?;
            snapshot.write_to(&output)?;
            info!(path = %output.display(), "snapshot written");
        }
    }

    let rate_limit = gateway.client().rate_limit();
    if rate_limit.limit > 0 {
        info!(
            remaining = rate_limit.remaining,
            limit = rate_limit.limit,
            "GitHub rate limit"
        );
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
