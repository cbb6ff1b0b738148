//! Tax summary derivation
//!
//! Turns a [`FinancialProfile`] into a [`TaxSummary`]: current taxable
//! income, potential savings and the final taxable amount. In the default
//! `derived` mode potential savings is the sum of the eligible deductions,
//! each bounded by its statutory ceiling. All amounts are whole rupees.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{SavingsMode, TaxConfig};
use crate::models::{
    DeductionBreakdown, DerivationWarning, FinancialProfile, InvestmentKind, TaxSummary,
};

/// Result of deriving a summary for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDerivation {
    pub summary: TaxSummary,
    pub mode: SavingsMode,
    /// Deductions considered (all zero in fixed mode)
    pub deductions: DeductionBreakdown,
    pub warnings: Vec<DerivationWarning>,
}

/// Derive the tax summary for a profile
pub fn derive_summary(profile: &FinancialProfile, config: &TaxConfig) -> SummaryDerivation {
    let current = rupees(profile.annual_income());

    let (deductions, requested) = match config.savings_mode {
        SavingsMode::Derived => {
            let breakdown = deduction_breakdown(profile, config);
            let total = breakdown.total();
            (breakdown, total)
        }
        SavingsMode::Fixed => (DeductionBreakdown::default(), rupees(config.fixed_savings)),
    };

    let (summary, warning) = TaxSummary::clamped(current, requested);
    let warnings: Vec<DerivationWarning> = warning.into_iter().collect();
    for w in &warnings {
        warn!(warning = %w, "Tax summary clamped");
    }

    debug!(
        mode = config.savings_mode.as_str(),
        current = summary.current_taxable_income,
        savings = summary.potential_savings,
        final_amount = summary.final_taxable_amount,
        "Derived tax summary"
    );

    SummaryDerivation {
        summary,
        mode: config.savings_mode,
        deductions,
        warnings,
    }
}

/// Capped deductions the profile is eligible for
pub fn deduction_breakdown(profile: &FinancialProfile, config: &TaxConfig) -> DeductionBreakdown {
    let salaried = profile.employment_type().is_salaried();

    DeductionBreakdown {
        section_80c: section_80c(profile, config),
        section_80ccd_1b: section_80ccd_1b(profile, config),
        section_80d: section_80d(profile, config),
        hra_exemption: if salaried {
            hra_exemption(profile, config)
        } else {
            0.0
        },
        section_80gg: if salaried {
            0.0
        } else {
            section_80gg(profile, config)
        },
        standard_deduction: if salaried {
            rupees(config.limits.standard_deduction)
        } else {
            0.0
        },
    }
}

/// Contributions eligible for the combined 80C pool.
///
/// NPS goes to 80CCD(1B) first; only the part above that ceiling spills
/// into 80C.
pub fn section_80c_contributions(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    let inv = profile.investments();
    let nps_overflow = (inv.get(InvestmentKind::Nps) - config.limits.section_80ccd_1b).max(0.0);
    inv.get(InvestmentKind::Ppf) + inv.get(InvestmentKind::Elss) + inv.get(InvestmentKind::Other)
        + nps_overflow
}

pub fn section_80c(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    rupees(section_80c_contributions(profile, config).min(config.limits.section_80c))
}

pub fn section_80ccd_1b(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    rupees(
        profile
            .investments()
            .get(InvestmentKind::Nps)
            .min(config.limits.section_80ccd_1b),
    )
}

pub fn section_80d(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    let limit = config.section_80d_limit(profile.age_group().is_senior());
    rupees(profile.insurance_premiums().min(limit))
}

/// HRA exemption: the least of allowance received, the exempt share of
/// basic salary, and rent paid above the threshold share of basic.
pub fn hra_exemption(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    let hra = &config.hra;
    let basic = profile.annual_income() * hra.basic_salary_share;
    let received = basic * hra.allowance_share_of_basic;
    let exempt_cap = basic * hra.exempt_share_of_basic;
    let excess_rent = profile.annual_rent() - basic * hra.rent_threshold_share_of_basic;

    rupees(min3(received, exempt_cap, excess_rent).max(0.0))
}

/// Section 80GG: the least of the annual cap, a share of income, and rent
/// paid above the threshold share of income.
pub fn section_80gg(profile: &FinancialProfile, config: &TaxConfig) -> f64 {
    let rules = &config.rent_deduction;
    let income = profile.annual_income();
    let cap = rules.monthly_cap * 12.0;
    let income_cap = income * rules.income_share;
    let excess_rent = profile.annual_rent() - income * rules.rent_threshold_share;

    rupees(min3(cap, income_cap, excess_rent).max(0.0))
}

fn min3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

/// Round to whole rupees
pub(crate) fn rupees(value: f64) -> f64 {
    value.round()
}
