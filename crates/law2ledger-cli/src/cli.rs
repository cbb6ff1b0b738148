//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Law2Ledger - Find the tax deductions you are leaving on the table
#[derive(Parser)]
#[command(name = "law2ledger")]
#[command(about = "Tax planning dashboard for Indian income-tax deductions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tax rules config file
    ///
    /// Falls back to LAW2LEDGER_CONFIG, then the override in the platform
    /// data directory, then the built-in rules.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a profile and show suggestions and the tax summary
    Analyze {
        /// Profile JSON file (camelCase fields, as sent by the dashboard)
        #[arg(short, long)]
        profile: PathBuf,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the tax summary report for a profile
    Export {
        /// Profile JSON file
        #[arg(short, long)]
        profile: PathBuf,

        /// Directory to write the report into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Report format (txt or json)
        #[arg(long, default_value = "txt")]
        format: String,
    },

    /// List the suggestion rules
    Rules,

    /// Show the effective tax rules config
    Config {
        /// Only print where an override file would be read from
        #[arg(long)]
        path: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
