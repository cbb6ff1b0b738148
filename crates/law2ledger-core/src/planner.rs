//! Intake → derivation pipeline

use serde::Serialize;
use tracing::info;

use crate::config::TaxConfig;
use crate::error::Result;
use crate::intake;
use crate::models::{FinancialProfile, PolicySuggestion, ProfileInput};
use crate::rules::{RuleInfo, SuggestionEngine};
use crate::tax::{derive_summary, SummaryDerivation};

/// Everything derived from one submitted profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub profile: FinancialProfile,
    pub suggestions: Vec<PolicySuggestion>,
    pub derivation: SummaryDerivation,
}

/// Holds the tax rules and the suggestion engine
pub struct TaxPlanner {
    config: TaxConfig,
    engine: SuggestionEngine,
}

impl Default for TaxPlanner {
    fn default() -> Self {
        Self::new(TaxConfig::default())
    }
}

impl TaxPlanner {
    pub fn new(config: TaxConfig) -> Self {
        Self::with_engine(config, SuggestionEngine::new())
    }

    pub fn with_engine(config: TaxConfig, engine: SuggestionEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn rules(&self) -> Vec<RuleInfo> {
        self.engine.catalog()
    }

    /// Validate raw input and analyze the resulting profile
    pub fn intake(&self, input: &ProfileInput) -> Result<Analysis> {
        let profile = intake::validate(input)?;
        Ok(self.analyze(profile))
    }

    pub fn analyze(&self, profile: FinancialProfile) -> Analysis {
        let suggestions = self.engine.evaluate(&profile, &self.config);
        let derivation = derive_summary(&profile, &self.config);

        info!(
            age_group = profile.age_group().as_str(),
            employment = profile.employment_type().as_str(),
            suggestions = suggestions.len(),
            final_amount = derivation.summary.final_taxable_amount,
            "Analyzed profile"
        );

        Analysis {
            profile,
            suggestions,
            derivation,
        }
    }
}
