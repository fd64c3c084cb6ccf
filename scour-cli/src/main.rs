//! Scour
//!
//! Retention sweeper for GitHub Actions artifacts. Applies an age cutoff, a
//! tag-protection rule, and a skip-N-most-recent exemption to every workflow
//! run within a 90-day horizon, then deletes what falls through.
//!
//! Architecture:
//! - Configuration: action inputs resolved from flags or `INPUT_*` env vars
//! - Api: trait seam over the GitHub client, swappable in tests
//! - Engine: phase-sequenced sweep with per-run concurrent fan-out

mod api;
mod config;
mod engine;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{ActionsApi, GithubActionsApi};
use crate::config::Config;
use crate::engine::{ArtifactDeleter, DryRunDeleter, GithubDeleter, PurgeEngine};
use scour_client::GithubClient;

#[derive(Parser)]
#[command(name = "scour")]
#[command(about = "Retention sweeper for GitHub Actions artifacts", long_about = None)]
struct Cli {
    /// Maximum artifact age as "<number> <unit>", e.g. "30 days"
    #[arg(long, env = "INPUT_AGE")]
    age: String,

    /// Skip runs whose head commit is tagged (boolean-like, default true)
    #[arg(long, env = "INPUT_SKIP_TAGS")]
    skip_tags: Option<String>,

    /// Exempt the N most recently encountered artifacts from deletion
    #[arg(long, env = "INPUT_SKIP_RECENT")]
    skip_recent: Option<String>,

    /// Repository as "owner/repo"
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Log every decision without deleting anything
    #[arg(long, env = "SCOUR_DRY_RUN")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scour=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::resolve(
        &cli.repository,
        cli.token,
        cli.api_url,
        &cli.age,
        cli.skip_tags.as_deref(),
        cli.skip_recent.as_deref(),
        cli.dry_run,
    )?;

    info!(
        "Maximum artifact age: {} (created before {})",
        cli.age, config.policy.max_age
    );
    info!(
        "Sweeping {} (skip-tags: {}, skip-recent: {}{})",
        config.repo,
        config.policy.skip_tags,
        config.policy.skip_recent,
        if config.dry_run { ", dry run" } else { "" }
    );

    let client = GithubClient::new(&config.api_url, &config.token, config.repo.clone());
    let api: Arc<dyn ActionsApi> = Arc::new(GithubActionsApi::new(client));

    let deleter: Arc<dyn ArtifactDeleter> = if config.dry_run {
        Arc::new(DryRunDeleter)
    } else {
        Arc::new(GithubDeleter::new(Arc::clone(&api)))
    };

    let engine = PurgeEngine::new(api, deleter, config.policy);

    if let Err(e) = engine.run().await {
        error!("Retention sweep failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
