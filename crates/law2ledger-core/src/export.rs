//! Tax summary export
//!
//! Renders the submitted profile, its tax summary and the ranked suggestions
//! as a downloadable report. Reports are deterministic: two exports of the
//! same data differ only in the generation date.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{FinancialProfile, InvestmentKind, PolicySuggestion, TaxSummary};
use crate::money::format_inr;

/// Export format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format '{}'. Use 'txt' or 'json'", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rendered report ready to be written or downloaded
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub generated_at: DateTime<Utc>,
    pub format: ExportFormat,
    pub body: String,
}

impl ExportReport {
    /// `Law2Ledger-Tax-Summary-<YYYY-MM-DD>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "Law2Ledger-Tax-Summary-{}.{}",
            self.generated_at.format("%Y-%m-%d"),
            self.format.as_str()
        )
    }
}

/// JSON shape of an exported report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument<'a> {
    generated: String,
    profile: &'a FinancialProfile,
    tax_summary: &'a TaxSummary,
    suggestions: &'a [PolicySuggestion],
}

/// Build an export report.
///
/// Fails with [`Error::ExportPrecondition`] when no profile has been
/// submitted yet, or when there is no summary or suggestion data to report.
pub fn build_report(
    profile: Option<&FinancialProfile>,
    summary: Option<&TaxSummary>,
    suggestions: &[PolicySuggestion],
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportReport> {
    let profile = profile.ok_or_else(|| {
        Error::ExportPrecondition("no profile has been submitted".to_string())
    })?;
    let summary = summary
        .ok_or_else(|| Error::ExportPrecondition("no tax summary is available".to_string()))?;
    if suggestions.is_empty() {
        return Err(Error::ExportPrecondition(
            "no suggestions are available".to_string(),
        ));
    }

    let generated = generated_at.format("%Y-%m-%d").to_string();
    let body = match format {
        ExportFormat::Text => render_text(&generated, profile, summary, suggestions),
        ExportFormat::Json => serde_json::to_string_pretty(&SummaryDocument {
            generated,
            profile,
            tax_summary: summary,
            suggestions,
        })?,
    };

    info!(
        format = format.as_str(),
        suggestions = suggestions.len(),
        "Built tax summary export"
    );

    Ok(ExportReport {
        generated_at,
        format,
        body,
    })
}

fn render_text(
    generated: &str,
    profile: &FinancialProfile,
    summary: &TaxSummary,
    suggestions: &[PolicySuggestion],
) -> String {
    let mut out = String::new();

    out.push_str("LAW2LEDGER TAX SUMMARY\n");
    out.push_str(&format!("Generated: {}\n", generated));

    heading(&mut out, "FINANCIAL PROFILE");
    line(&mut out, "Annual Income", &format_inr(profile.annual_income()));
    line(&mut out, "Monthly Rent", &format_inr(profile.monthly_rent()));
    line(
        &mut out,
        "Insurance Premiums",
        &format_inr(profile.insurance_premiums()),
    );
    line(&mut out, "Age Group", profile.age_group().as_str());
    line(&mut out, "Employment Type", profile.employment_type().label());

    heading(&mut out, "INVESTMENTS");
    let investments = profile.investments();
    for kind in InvestmentKind::all() {
        line(&mut out, kind.label(), &format_inr(investments.get(*kind)));
    }
    line(&mut out, "Total Investments", &format_inr(investments.total()));

    heading(&mut out, "TAX ANALYSIS");
    line(
        &mut out,
        "Current Taxable Income",
        &format_inr(summary.current_taxable_income),
    );
    line(
        &mut out,
        "Potential Savings",
        &format_inr(summary.potential_savings),
    );
    line(
        &mut out,
        "Final Taxable Amount",
        &format_inr(summary.final_taxable_amount),
    );

    heading(&mut out, "RECOMMENDED POLICIES");
    for (i, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} [{}]\n   {}\n   {}\n",
            i + 1,
            suggestion.title,
            suggestion.category,
            suggestion.estimated_savings,
            suggestion.description
        ));
    }

    out
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{}: {}\n", label, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxConfig;
    use crate::intake::validate;
    use crate::models::{InvestmentsInput, ProfileInput};
    use crate::rules::SuggestionEngine;
    use crate::tax::derive_summary;
    use chrono::TimeZone;

    fn reference() -> (FinancialProfile, TaxSummary, Vec<PolicySuggestion>) {
        let profile = validate(&ProfileInput {
            annual_income: Some(1_200_000.0),
            monthly_rent: Some(25_000.0),
            investments: Some(InvestmentsInput {
                ppf: Some(150_000.0),
                elss: Some(50_000.0),
                nps: Some(50_000.0),
                other: Some(25_000.0),
            }),
            insurance_premiums: Some(50_000.0),
            age_group: Some("26-35".to_string()),
            employment_type: Some("Salaried".to_string()),
        })
        .unwrap();
        let config = TaxConfig::default();
        let summary = derive_summary(&profile, &config).summary;
        let suggestions = SuggestionEngine::new().evaluate(&profile, &config);
        (profile, summary, suggestions)
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_text_report_sections() {
        let (profile, summary, suggestions) = reference();
        let report = build_report(
            Some(&profile),
            Some(&summary),
            &suggestions,
            ExportFormat::Text,
            at(15),
        )
        .unwrap();

        assert_eq!(report.file_name(), "Law2Ledger-Tax-Summary-2024-03-15.txt");
        let body = &report.body;
        assert!(body.contains("Generated: 2024-03-15"));
        assert!(body.contains("FINANCIAL PROFILE"));
        assert!(body.contains("Annual Income: ₹12,00,000"));
        assert!(body.contains("Employment Type: Salaried Employee"));
        assert!(body.contains("PPF: ₹1,50,000"));
        assert!(body.contains("Total Investments: ₹2,75,000"));
        assert!(body.contains("Current Taxable Income: ₹12,00,000"));
        assert!(body.contains("Final Taxable Amount: ₹6,85,000"));
        assert!(body.contains("RECOMMENDED POLICIES"));
        assert!(body.contains("1. HRA Exemption [Allowance]"));
    }

    #[test]
    fn test_reports_differ_only_in_date() {
        let (profile, summary, suggestions) = reference();
        let first = build_report(
            Some(&profile),
            Some(&summary),
            &suggestions,
            ExportFormat::Text,
            at(1),
        )
        .unwrap();
        let second = build_report(
            Some(&profile),
            Some(&summary),
            &suggestions,
            ExportFormat::Text,
            at(2),
        )
        .unwrap();

        let first_lines: Vec<&str> = first.body.lines().collect();
        let second_lines: Vec<&str> = second.body.lines().collect();
        assert_eq!(first_lines.len(), second_lines.len());

        let differing: Vec<usize> = first_lines
            .iter()
            .zip(&second_lines)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(differing.len(), 1);
        assert!(first_lines[differing[0]].starts_with("Generated:"));
    }

    #[test]
    fn test_missing_profile_rejected() {
        let (_, summary, suggestions) = reference();
        let err = build_report(None, Some(&summary), &suggestions, ExportFormat::Text, at(1))
            .unwrap_err();
        assert!(matches!(err, Error::ExportPrecondition(_)));
    }

    #[test]
    fn test_missing_summary_or_suggestions_rejected() {
        let (profile, summary, _) = reference();
        assert!(matches!(
            build_report(Some(&profile), None, &[], ExportFormat::Text, at(1)),
            Err(Error::ExportPrecondition(_))
        ));
        assert!(matches!(
            build_report(Some(&profile), Some(&summary), &[], ExportFormat::Json, at(1)),
            Err(Error::ExportPrecondition(_))
        ));
    }

    #[test]
    fn test_json_report() {
        let (profile, summary, suggestions) = reference();
        let report = build_report(
            Some(&profile),
            Some(&summary),
            &suggestions,
            ExportFormat::Json,
            at(15),
        )
        .unwrap();

        assert_eq!(report.file_name(), "Law2Ledger-Tax-Summary-2024-03-15.json");
        let value: serde_json::Value = serde_json::from_str(&report.body).unwrap();
        assert_eq!(value["generated"], "2024-03-15");
        assert_eq!(value["taxSummary"]["finalTaxableAmount"], 685_000.0);
        assert_eq!(value["profile"]["ageGroup"], "26-35");
        assert_eq!(
            value["suggestions"].as_array().unwrap().len(),
            suggestions.len()
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
