use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod configuration;
mod error;
mod render;

use commands::ask::AskArgs;
use configuration::Settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a toml settings file (./council.toml is read when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask every council member a question, then have the chairman synthesize an answer
    Ask(AskArgs),

    /// Show the configured council members and chairman
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the filter so RUST_LOG can live there too
    let env_file = dotenv();

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = env_file {
        tracing::debug!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Ask(args) => commands::ask::run(&settings, args).await,
        Command::Models => {
            commands::models::run(&settings);
            Ok(())
        }
    }
}
