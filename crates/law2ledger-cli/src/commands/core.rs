//! Shared utilities for commands
//!
//! - `load_planner` - Resolve the tax config and build a planner
//! - `read_profile` - Load a profile payload from a JSON file
//! - `report_rejection` - Print field errors for a rejected profile

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use law2ledger_core::{Error, ProfileInput, TaxConfig, TaxPlanner};

/// Load the tax config (explicit path, env var, data dir, built-in) and build a planner
pub fn load_planner(config_path: Option<&Path>) -> Result<TaxPlanner> {
    let config = TaxConfig::load(config_path).context("Failed to load tax config")?;
    Ok(TaxPlanner::new(config))
}

pub fn read_profile(path: &Path) -> Result<ProfileInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid profile JSON: {}", path.display()))
}

/// Print every field error of a rejected profile before propagating
pub fn report_rejection<T>(result: law2ledger_core::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(Error::Validation(errors)) => {
            eprintln!("❌ Profile rejected:");
            for field in errors.fields() {
                eprintln!("   {:<22} {}", field.field, field.message);
            }
            anyhow::bail!("{} field(s) failed validation", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
