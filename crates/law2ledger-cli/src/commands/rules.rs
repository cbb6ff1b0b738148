//! Rule catalog and config commands

use std::path::Path;

use anyhow::{Context, Result};
use law2ledger_core::config::default_config_path;
use law2ledger_core::{TaxConfig, TaxPlanner};

use super::truncate;

/// List the suggestion rules the planner evaluates
pub fn cmd_rules(planner: &TaxPlanner) -> Result<()> {
    let rules = planner.rules();

    println!("Suggestion Rules:\n");
    println!("{:<32} {:<18} {}", "ID", "CATEGORY", "TITLE");
    println!("{}", "-".repeat(90));

    for rule in &rules {
        println!(
            "{:<32} {:<18} {}",
            rule.id,
            rule.category.as_str(),
            truncate(rule.title, 40)
        );
    }

    println!();
    println!("{} rule(s)", rules.len());
    Ok(())
}

/// Print the effective tax config, or just the override location
pub fn cmd_config(config_path: Option<&Path>, path_only: bool) -> Result<()> {
    let override_path = default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not available)".to_string());

    if path_only {
        println!("{}", override_path);
        return Ok(());
    }

    let config = TaxConfig::load(config_path).context("Failed to load tax config")?;
    let rendered = config.to_toml().context("Failed to render tax config")?;

    println!("# Effective tax rules");
    println!("# Override file: {}", override_path);
    println!();
    print!("{}", rendered);
    Ok(())
}
