mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{CheckArgs, RefreshArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request MFA session credentials and store them in the credentials file
    Refresh(RefreshArgs),
    /// Check if current token session has expired
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    use Commands::*;
    match cli.command {
        Refresh(args) => args.main().await,
        Check(args) => args.main().await,
    }
}
