//! Profile analysis command

use std::path::Path;

use anyhow::{Context, Result};
use law2ledger_core::money::format_inr;
use law2ledger_core::{Analysis, TaxPlanner};

use super::{read_profile, report_rejection, truncate};

/// Validate a profile file and print its suggestions and tax summary
pub fn cmd_analyze(planner: &TaxPlanner, profile_path: &Path, json: bool) -> Result<()> {
    let input = read_profile(profile_path)?;
    let analysis = report_rejection(planner.intake(&input))?;

    if json {
        let out = serde_json::to_string_pretty(&analysis)
            .context("Failed to serialize analysis")?;
        println!("{}", out);
        return Ok(());
    }

    print_analysis(&analysis);
    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    let profile = &analysis.profile;
    let summary = &analysis.derivation.summary;

    println!("📋 Profile");
    println!("   Annual income:  {}", format_inr(profile.annual_income()));
    println!("   Monthly rent:   {}", format_inr(profile.monthly_rent()));
    println!(
        "   Investments:    {}",
        format_inr(profile.investments().total())
    );
    println!(
        "   Insurance:      {}",
        format_inr(profile.insurance_premiums())
    );
    println!(
        "   {} · {}",
        profile.age_group(),
        profile.employment_type().label()
    );
    println!();

    println!("💡 Suggestions ({}):\n", analysis.suggestions.len());
    println!("{:<42} {:<18} {:>14}", "POLICY", "CATEGORY", "ESTIMATE");
    println!("{}", "-".repeat(76));
    for s in &analysis.suggestions {
        println!(
            "{:<42} {:<18} {:>14}",
            truncate(&s.title, 42),
            s.category.as_str(),
            format_inr(s.estimated_amount)
        );
    }
    println!();

    println!(
        "🧾 Tax summary ({} savings)",
        analysis.derivation.mode.as_str()
    );
    println!(
        "   Current taxable income: {:>14}",
        format_inr(summary.current_taxable_income)
    );
    println!(
        "   Potential savings:      {:>14}",
        format_inr(summary.potential_savings)
    );
    println!(
        "   Final taxable amount:   {:>14}",
        format_inr(summary.final_taxable_amount)
    );

    for warning in &analysis.derivation.warnings {
        println!("   ⚠️  {}", warning);
    }
}
