mod api;
mod cli;
mod config;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "quiniela")]
#[command(about = "Football match predictions from recent form and Monte Carlo simulation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Predict a scheduled match by its provider id
    Predict {
        #[arg(short, long)]
        match_id: u64,
    },
    /// Rating-only prediction for two team names
    PredictNames {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
    },
    /// List competitions
    Leagues,
    /// List scheduled matches of a competition
    Matches {
        #[arg(short, long)]
        competition: u64,
    },
    /// List teams of a competition
    Teams {
        #[arg(short, long)]
        competition: u64,
    },
    /// Show a competition's standings
    Standings {
        #[arg(short, long)]
        competition: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.port);
            tracing::info!("Starting Quiniela API server on port {}", port);
            api::serve(config, port).await?;
        }
        Some(Commands::Predict { match_id }) => {
            cli::predict_match(&config, match_id).await?;
        }
        Some(Commands::PredictNames { home, away }) => {
            cli::predict_names(&config, &home, &away)?;
        }
        Some(Commands::Leagues) => {
            cli::show_leagues(&config).await?;
        }
        Some(Commands::Matches { competition }) => {
            cli::show_matches(&config, competition).await?;
        }
        Some(Commands::Teams { competition }) => {
            cli::show_teams(&config, competition).await?;
        }
        Some(Commands::Standings { competition }) => {
            cli::show_standings(&config, competition).await?;
        }
        None => {
            // Default to serving
            let port = config.port;
            tracing::info!("Starting Quiniela API server on port {}", port);
            api::serve(config, port).await?;
        }
    }

    Ok(())
}
