//! Law2Ledger CLI - Tax planning dashboard
//!
//! Usage:
//!   law2ledger analyze --profile me.json    Show suggestions and tax summary
//!   law2ledger export --profile me.json     Write the summary report
//!   law2ledger rules                        List suggestion rules
//!   law2ledger serve --port 3000            Start web server

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
        Commands::Analyze { profile, json } => {
            let planner = commands::load_planner(cli.config.as_deref())?;
            commands::cmd_analyze(&planner, &profile, json)
        }
        Commands::Export {
            profile,
            output,
            format,
        } => {
            let planner = commands::load_planner(cli.config.as_deref())?;
            commands::cmd_export(&planner, &profile, &output, &format).map(|_| ())
        }
        Commands::Rules => {
            let planner = commands::load_planner(cli.config.as_deref())?;
            commands::cmd_rules(&planner)
        }
        Commands::Config { path } => commands::cmd_config(cli.config.as_deref(), path),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let planner = commands::load_planner(cli.config.as_deref())?;
            commands::cmd_serve(planner, &host, port, static_dir.as_deref()).await
        }
    }
}
