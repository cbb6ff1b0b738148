//! Suggestion Engine - profile-driven policy matching
//!
//! Each rule is a small, self-contained evaluator: an applicability
//! predicate over the profile, a savings estimator and static descriptive
//! text. The engine evaluates every registered rule once per profile and
//! returns the applicable suggestions, most valuable first.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use law2ledger_core::rules::SuggestionEngine;
//!
//! let engine = SuggestionEngine::new();
//! let suggestions = engine.evaluate(&profile, &config);
//! ```

pub mod catalog;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TaxConfig;
use crate::models::{FinancialProfile, PolicySuggestion, SuggestionCategory};
use crate::money::format_inr;

pub use catalog::{
    HraExemptionRule, NpsContributionRule, RentPaidRule, Section80CRule, Section80DRule,
    SeniorSavingsSchemeRule,
};

/// Everything a rule may look at while evaluating
pub struct RuleContext<'a> {
    pub profile: &'a FinancialProfile,
    pub config: &'a TaxConfig,
    /// Marginal rate for the profile's income band
    pub rate: f64,
}

impl<'a> RuleContext<'a> {
    pub fn new(profile: &'a FinancialProfile, config: &'a TaxConfig) -> Self {
        Self {
            profile,
            config,
            rate: config.marginal_rate(profile.annual_income()),
        }
    }
}

/// Deduction a rule can offer this profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Largest deduction available to the profile under this rule
    pub claimable: f64,
    /// Amount already contributed towards it, when the profile tracks one
    pub claimed: Option<f64>,
}

impl Estimate {
    pub fn unused(&self) -> f64 {
        (self.claimable - self.claimed.unwrap_or(0.0)).max(0.0)
    }
}

/// Static descriptive payload of a rule
#[derive(Debug, Clone, Copy)]
pub struct RuleText {
    pub title: &'static str,
    pub description: &'static str,
    pub details: Option<&'static str>,
    pub eligibility: Option<&'static str>,
    pub official_link: Option<&'static str>,
}

/// Trait for suggestion rules
pub trait SuggestionRule: Send + Sync {
    /// Unique identifier, also used as the suggestion id
    fn id(&self) -> &'static str;

    fn category(&self) -> SuggestionCategory;

    fn text(&self) -> RuleText;

    /// Whether the rule applies to this profile at all
    fn applies(&self, ctx: &RuleContext<'_>) -> bool;

    /// Deduction available under this rule
    fn estimate(&self, ctx: &RuleContext<'_>) -> Estimate;
}

/// Catalog entry describing a registered rule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub category: SuggestionCategory,
    pub description: &'static str,
}

/// Evaluates registered rules against a profile
pub struct SuggestionEngine {
    rules: Vec<Box<dyn SuggestionRule>>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(Section80CRule));
        engine.register(Box::new(NpsContributionRule));
        engine.register(Box::new(Section80DRule));
        engine.register(Box::new(HraExemptionRule));
        engine.register(Box::new(RentPaidRule));
        engine.register(Box::new(SeniorSavingsSchemeRule));

        engine
    }

    /// Create an engine with no rules registered
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. A rule whose id is already registered replaces the
    /// earlier one in place, so suggestion ids stay unique.
    pub fn register(&mut self, rule: Box<dyn SuggestionRule>) {
        match self.rules.iter_mut().find(|r| r.id() == rule.id()) {
            Some(existing) => {
                warn!(rule = rule.id(), "Replacing rule registered under the same id");
                *existing = rule;
            }
            None => self.rules.push(rule),
        }
    }

    /// Evaluate all rules and return applicable suggestions.
    ///
    /// Ordered by unused savings (headroom × rate), then total estimated
    /// savings, then registration order.
    pub fn evaluate(&self, profile: &FinancialProfile, config: &TaxConfig) -> Vec<PolicySuggestion> {
        let ctx = RuleContext::new(profile, config);

        let mut ranked: Vec<(f64, PolicySuggestion)> = Vec::new();
        for rule in &self.rules {
            if !rule.applies(&ctx) {
                debug!(rule = rule.id(), "Rule not applicable");
                continue;
            }

            let estimate = rule.estimate(&ctx);
            let suggestion = build_suggestion(rule.as_ref(), &estimate, ctx.rate);
            let additional = (estimate.unused() * ctx.rate).round();

            debug!(
                rule = rule.id(),
                claimable = estimate.claimable,
                unused = estimate.unused(),
                savings = suggestion.estimated_amount,
                "Rule applied"
            );
            ranked.push((additional, suggestion));
        }

        ranked.sort_by(|(a_extra, a), (b_extra, b)| {
            b_extra
                .total_cmp(a_extra)
                .then_with(|| b.estimated_amount.total_cmp(&a.estimated_amount))
        });

        ranked.into_iter().map(|(_, s)| s).collect()
    }

    /// Describe registered rules
    pub fn catalog(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|rule| {
                let text = rule.text();
                RuleInfo {
                    id: rule.id(),
                    title: text.title,
                    category: rule.category(),
                    description: text.description,
                }
            })
            .collect()
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

fn build_suggestion(rule: &dyn SuggestionRule, estimate: &Estimate, rate: f64) -> PolicySuggestion {
    let text = rule.text();
    let amount = (estimate.claimable * rate).round();

    let usage = estimate.claimed.map(|claimed| {
        format!(
            "You have used {} of the {} limit; {} remains.",
            format_inr(claimed.min(estimate.claimable)),
            format_inr(estimate.claimable),
            format_inr(estimate.unused())
        )
    });
    let details = match (text.details, usage) {
        (Some(d), Some(u)) => Some(format!("{} {}", d, u)),
        (Some(d), None) => Some(d.to_string()),
        (None, Some(u)) => Some(u),
        (None, None) => None,
    };

    PolicySuggestion {
        id: rule.id().to_string(),
        title: text.title.to_string(),
        estimated_savings: format!("Save up to {}", format_inr(amount)),
        estimated_amount: amount,
        unused_limit: estimate.unused().round(),
        description: text.description.to_string(),
        details,
        eligibility: text.eligibility.map(str::to_string),
        category: rule.category(),
        official_link: text.official_link.map(str::to_string),
    }
}
