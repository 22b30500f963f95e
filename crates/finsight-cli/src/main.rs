//! FinSight CLI - Personal finance backend
//!
//! Usage:
//!   finsight init                   Initialize database
//!   finsight serve --port 8080      Start the REST API server
//!   finsight seed --email a@b.com   Seed sample transactions for a user
//!   finsight status                 Show database status

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            allow_origin,
        } => commands::cmd_serve(&cli.db, &host, port, allow_origin, cli.no_encrypt).await,
        Commands::Seed { email } => commands::cmd_seed(&cli.db, &email, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
    }
}
