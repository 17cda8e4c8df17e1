use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsbell_core::{AppConfig, RunOptions};

mod commands;

#[derive(Parser)]
#[command(name = "newsbell")]
#[command(author, version, about = "Fetch feeds, filter by keyword and push a digest")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (defaults to ~/.config/newsbell/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Sources file with feeds and keyword filters
    #[arg(short = 's', long, global = true, default_value = "news_sources.json")]
    sources: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter, format and push once
    Run(RunArgs),
    /// List configured sources and keywords
    Sources,
    /// Append feeds from an OPML export to the sources file
    Import {
        /// OPML file to read
        file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Build the report and print it instead of pushing
    #[arg(long)]
    dry_run: bool,
    /// Skip AI summarization
    #[arg(long)]
    plain: bool,
    /// Exit with status 2 when every attempted push channel failed,
    /// and 1 when the settings or sources file cannot be loaded
    #[arg(long)]
    strict: bool,
}

fn load_config(path: Option<&PathBuf>) -> newsbell_core::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env();
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    // Initialize logging
    let level = config
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(level),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            let strict = matches!(&cli.command, Some(Commands::Run(args)) if args.strict);
            return Ok(commands::run::load_failure_exit(strict));
        }
    };

    match cli.command {
        Some(Commands::Run(args)) => {
            let options = RunOptions {
                dry_run: args.dry_run,
                plain_only: args.plain,
            };
            commands::run::run(config, &cli.sources, options, args.strict).await
        }
        None => {
            commands::run::run(config, &cli.sources, RunOptions::default(), false).await
        }
        Some(Commands::Sources) => {
            commands::sources::run(&config, &cli.sources)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Import { file }) => {
            commands::import::run(&cli.sources, &file)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
