//! Built-in suggestion rules

use crate::models::{InvestmentKind, SuggestionCategory};
use crate::tax;

use super::{Estimate, RuleContext, RuleText, SuggestionRule};

const INCOME_TAX_PORTAL: &str = "https://www.incometax.gov.in";

/// Section 80C: PPF, ELSS, tax-saver deposits and similar instruments
pub struct Section80CRule;

impl SuggestionRule for Section80CRule {
    fn id(&self) -> &'static str {
        "section_80c"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::Investment
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "Section 80C – Investment Deductions",
            description: "Invest in PPF, ELSS, NSC, or life insurance premiums to claim deductions up to ₹1.5 lakh.",
            details: Some("PPF, ELSS, 5-year tax-saver deposits, ULIPs and Sukanya Samriddhi deposits share one combined annual limit."),
            eligibility: Some("All individual taxpayers."),
            official_link: Some(INCOME_TAX_PORTAL),
        }
    }

    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: ctx.config.limits.section_80c,
            claimed: Some(tax::section_80c_contributions(ctx.profile, ctx.config)),
        }
    }
}

/// Section 80CCD(1B): additional NPS contribution
pub struct NpsContributionRule;

impl SuggestionRule for NpsContributionRule {
    fn id(&self) -> &'static str {
        "section_80ccd_1b"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::Retirement
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "Section 80CCD(1B) – NPS Contribution",
            description: "Contribute to the National Pension System for an extra deduction over and above the Section 80C limit.",
            details: Some("Contributions are split between equity and debt; withdrawals are available after age 60."),
            eligibility: Some("Individuals holding an NPS Tier I account."),
            official_link: Some(INCOME_TAX_PORTAL),
        }
    }

    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: ctx.config.limits.section_80ccd_1b,
            claimed: Some(ctx.profile.investments().get(InvestmentKind::Nps)),
        }
    }
}

/// Section 80D: health insurance premiums
pub struct Section80DRule;

impl SuggestionRule for Section80DRule {
    fn id(&self) -> &'static str {
        "section_80d"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::Insurance
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "Section 80D – Health Insurance Premium",
            description: "Claim deductions for health insurance premiums paid for yourself and family members.",
            details: Some("Senior citizens get a higher limit. Preventive health check-ups count towards the same limit."),
            eligibility: Some("Premiums paid by any mode other than cash."),
            official_link: Some(INCOME_TAX_PORTAL),
        }
    }

    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: ctx
                .config
                .section_80d_limit(ctx.profile.age_group().is_senior()),
            claimed: Some(ctx.profile.insurance_premiums()),
        }
    }
}

/// House rent allowance exemption for salaried employees
pub struct HraExemptionRule;

impl SuggestionRule for HraExemptionRule {
    fn id(&self) -> &'static str {
        "hra_exemption"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::Allowance
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "HRA Exemption",
            description: "House Rent Allowance exemption based on your monthly rent and salary structure.",
            details: Some("The exemption is the least of the HRA received, a share of basic salary, and rent paid above 10% of basic salary."),
            eligibility: Some("Salaried employees who receive HRA and pay rent."),
            official_link: None,
        }
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.profile.monthly_rent() > 0.0 && ctx.profile.employment_type().is_salaried()
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: tax::hra_exemption(ctx.profile, ctx.config),
            claimed: None,
        }
    }
}

/// Section 80GG: rent paid without an HRA component
pub struct RentPaidRule;

impl SuggestionRule for RentPaidRule {
    fn id(&self) -> &'static str {
        "section_80gg"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::Allowance
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "Section 80GG – Rent Paid Deduction",
            description: "Deduct rent paid when your income does not include a house rent allowance.",
            details: Some("The deduction is the least of ₹5,000 a month, 25% of total income, and rent paid above 10% of total income."),
            eligibility: Some("Self-employed individuals and employees without HRA who do not own a house where they live."),
            official_link: Some(INCOME_TAX_PORTAL),
        }
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.profile.monthly_rent() > 0.0 && !ctx.profile.employment_type().is_salaried()
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: tax::section_80gg(ctx.profile, ctx.config),
            claimed: None,
        }
    }
}

/// Senior Citizens' Savings Scheme, deductible within the 80C limit
pub struct SeniorSavingsSchemeRule;

impl SuggestionRule for SeniorSavingsSchemeRule {
    fn id(&self) -> &'static str {
        "senior_citizen_savings_scheme"
    }

    fn category(&self) -> SuggestionCategory {
        SuggestionCategory::GovernmentScheme
    }

    fn text(&self) -> RuleText {
        RuleText {
            title: "Senior Citizens' Savings Scheme",
            description: "A government-backed deposit with quarterly interest payouts for retirees.",
            details: Some("Deposits count towards the combined Section 80C limit and have a five-year tenure."),
            eligibility: Some("Individuals aged 60 or above, or 55 and above on voluntary retirement."),
            official_link: None,
        }
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.profile.age_group().is_senior()
    }

    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate {
        Estimate {
            claimable: ctx.config.limits.section_80c,
            claimed: Some(tax::section_80c_contributions(ctx.profile, ctx.config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxConfig;
    use crate::intake::validate;
    use crate::models::ProfileInput;

    fn profile(rent: f64, age: &str, employment: &str) -> crate::models::FinancialProfile {
        validate(&ProfileInput {
            annual_income: Some(900_000.0),
            monthly_rent: Some(rent),
            age_group: Some(age.to_string()),
            employment_type: Some(employment.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rent_rules_are_mutually_exclusive() {
        let config = TaxConfig::default();
        for employment in ["Salaried", "Self-employed", "Government"] {
            let p = profile(15_000.0, "26-35", employment);
            let ctx = RuleContext::new(&p, &config);
            assert_ne!(
                HraExemptionRule.applies(&ctx),
                RentPaidRule.applies(&ctx),
                "{} should match exactly one rent rule",
                employment
            );
        }
    }

    #[test]
    fn test_rent_rules_need_rent() {
        let config = TaxConfig::default();
        let p = profile(0.0, "26-35", "Salaried");
        let ctx = RuleContext::new(&p, &config);
        assert!(!HraExemptionRule.applies(&ctx));
        assert!(!RentPaidRule.applies(&ctx));
    }

    #[test]
    fn test_senior_scheme_only_for_oldest_band() {
        let config = TaxConfig::default();
        let senior = profile(0.0, "55+", "Government");
        let younger = profile(0.0, "46-55", "Government");

        assert!(SeniorSavingsSchemeRule.applies(&RuleContext::new(&senior, &config)));
        assert!(!SeniorSavingsSchemeRule.applies(&RuleContext::new(&younger, &config)));
    }

    #[test]
    fn test_80d_estimate_uses_age_limit() {
        let config = TaxConfig::default();
        let senior = profile(0.0, "55+", "Salaried");
        let estimate = Section80DRule.estimate(&RuleContext::new(&senior, &config));
        assert_eq!(estimate.claimable, 50_000.0);
        assert_eq!(estimate.unused(), 50_000.0);
    }

    #[test]
    fn test_rule_ids_unique() {
        let rules: Vec<Box<dyn SuggestionRule>> = vec![
            Box::new(Section80CRule),
            Box::new(NpsContributionRule),
            Box::new(Section80DRule),
            Box::new(HraExemptionRule),
            Box::new(RentPaidRule),
            Box::new(SeniorSavingsSchemeRule),
        ];
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }
}
