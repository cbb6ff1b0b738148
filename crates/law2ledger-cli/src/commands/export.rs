//! Summary export command

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use law2ledger_core::{Dashboard, ExportFormat, TaxPlanner};

use super::{read_profile, report_rejection};

/// Analyze a profile and write the report into `output_dir`.
///
/// Returns the path of the written file.
pub fn cmd_export(
    planner: &TaxPlanner,
    profile_path: &Path,
    output_dir: &Path,
    format: &str,
) -> Result<PathBuf> {
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    let input = read_profile(profile_path)?;

    let mut dashboard = Dashboard::new();
    report_rejection(dashboard.submit(&input, planner))?;

    let report = dashboard
        .export(format, Utc::now())
        .context("Failed to build report")?;

    let output = output_dir.join(report.file_name());
    if output.exists() {
        anyhow::bail!(
            "Output file already exists: {}\nUse a different directory or remove the existing file.",
            output.display()
        );
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    fs::write(&output, &report.body)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;

    println!("✅ Tax summary written to {}", output.display());
    Ok(output)
}
