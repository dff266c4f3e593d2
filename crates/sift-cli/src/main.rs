//! Sift CLI - Debounced, paginated article search from the terminal

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, search, shell};
use config::Config;
use output::OutputFormat;
use sift_client::MockSearchClient;
use sift_controller::SearchController;

#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about = "Debounced, paginated article search")]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: text, json (overrides the config file)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(config::default_config_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search once and print the results
    Search(search::SearchArgs),
    /// Interactive search driven by stdin
    Shell,
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Settings shared by the searching commands
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let path = cli.config_path();
        tracing::debug!("Using config at: {:?}", path);

        let config = Config::load(&path)?;
        let format = OutputFormat::from(cli.format.as_deref().unwrap_or(&config.format));

        Ok(Self { config, format })
    }

    /// Build a controller over the simulated backend
    pub fn controller(&self) -> anyhow::Result<SearchController<MockSearchClient>> {
        let client = MockSearchClient::with_config(self.config.backend.clone());
        Ok(SearchController::new(client, self.config.controller.clone())?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting sift CLI");

    match &cli.command {
        Commands::Search(args) => {
            let ctx = AppContext::new(&cli)?;
            search::run(args, &ctx).await?
        }
        Commands::Shell => {
            let ctx = AppContext::new(&cli)?;
            shell::run(&ctx).await?
        }
        Commands::Config(args) => commands::config::run(args, &cli.config_path())?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
