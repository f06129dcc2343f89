mod api;
mod config;
mod doctor_cmd;
mod status_cmd;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use accessibridge_analysis::{ScoreReport, WcagCheck};
use accessibridge_core::IssueCounts;

use api::AppState;
use config::Config;

#[derive(Parser)]
#[command(name = "accessibridge")]
#[command(about = "AccessiBridge: AI-assisted web accessibility analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the AccessiBridge HTTP API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status,
    /// Check the environment configuration
    Doctor,
    /// Compute the WCAG contrast ratio of two hex colors
    Contrast {
        foreground: String,
        background: String,
    },
    /// Score a page from its issue counts
    Score {
        missing_alt: u32,
        contrast_issues: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    accessibridge_logging::init_logger(&config.log_level, config.log_dir.as_deref().map(Path::new));

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => status_cmd::run(config.port).await?,
        Commands::Doctor => doctor_cmd::run(&config),
        Commands::Contrast { foreground, background } => {
            let check = WcagCheck::evaluate(&foreground, &background)?;
            println!("{}", serde_json::to_string_pretty(&check)?);
        }
        Commands::Score { missing_alt, contrast_issues } => {
            let report = ScoreReport::new(IssueCounts { missing_alt, contrast_issues });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        model = %config.model,
        ai_enabled = config.ai_enabled(),
        failure_mode = %config.alt_failure_mode,
        "Starting AccessiBridge"
    );

    if !config.ai_enabled() {
        warn!("OPENROUTER_API_KEY not set. AI will fall back.");
    }

    let addr = format!("{}:{}", config.bind_address, config.port);
    let state = Arc::new(AppState::from_config(config)?);
    let app = api::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("AccessiBridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
