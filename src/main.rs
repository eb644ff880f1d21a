//! Changelogger server
//!
//! Run with: cargo run -- serve
//!
//! # Configuration
//!
//! `--config PATH`, else `$XDG_CONFIG_HOME/changelogger/config.toml`, else
//! `./config.toml`, else defaults. Environment variables override the file:
//! - `CHANGELOGGER_HOST` / `CHANGELOGGER_PORT`
//! - `CHANGELOGGER_FRONTEND_URL` / `CHANGELOGGER_PUBLIC_URL`
//! - `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET`
//! - `OPENAI_API_KEY`
//! - `CHANGELOGGER_DATABASE`
//! - `RUST_LOG`: Log filter (default: changelogger=info,tower_http=info)

use anyhow::Context;
use changelogger::api::{serve, AppState};
use changelogger::config::{generate_default_config, Config, LoggingConfig};
use changelogger::generator::{ChangelogGenerator, OpenAiGenerator};
use changelogger::github::GitHubClient;
use changelogger::storage::ChangelogStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "changelogger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate and publish changelogs from GitHub commits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, host, port } => {
            let mut config =
                Config::load_default(config.as_deref()).context("Failed to load configuration")?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            init_tracing(&config.logging);
            run_server(config).await
        }
        Commands::InitConfig { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Changelogger API server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = config.storage.resolved_path();
    tracing::info!("Database: {:?}", db_path);
    let store = ChangelogStore::open(&db_path).context("Failed to open changelog store")?;

    let github = Arc::new(GitHubClient::new(&config.github).context("Failed to build GitHub client")?);
    if !config.github.oauth_configured() {
        tracing::warn!("GitHub OAuth not configured (set GITHUB_CLIENT_ID and GITHUB_CLIENT_SECRET)");
    }

    let generator = Arc::new(
        OpenAiGenerator::new(config.llm.clone()).context("Failed to build LLM client")?,
    );
    if generator.is_configured() {
        tracing::info!("Changelog generation enabled: {} via {}", config.llm.model, config.llm.base_url);
    } else {
        tracing::warn!("Changelog generation disabled (set OPENAI_API_KEY to enable)");
    }

    let state = AppState::new(store, github, generator, config);
    serve(state).await?;

    tracing::info!("Changelogger API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("changelogger={},tower_http={}", logging.level, logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
