//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use law2ledger_core::TaxPlanner;
use law2ledger_server::{parse_allowed_origins, ServerConfig, ALLOWED_ORIGINS_ENV_VAR};

pub async fn cmd_serve(
    planner: TaxPlanner,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Law2Ledger web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!(
        "   Savings mode: {}",
        planner.config().savings_mode.as_str()
    );

    let allowed_origins =
        parse_allowed_origins(&std::env::var(ALLOWED_ORIGINS_ENV_VAR).unwrap_or_default());
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV_VAR
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig {
        allowed_origins,
        ..ServerConfig::default()
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    law2ledger_server::serve_with_config(planner, host, port, static_dir_str, config).await?;

    Ok(())
}
