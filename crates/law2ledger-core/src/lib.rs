//! Law2Ledger Core Library
//!
//! Shared functionality for the Law2Ledger tax planning dashboard:
//! - Profile intake with field-level validation
//! - Rule-based tax-saving suggestions
//! - Tax summary derivation with capped deductions
//! - Plain-text and JSON summary export
//! - Dashboard navigation state machine
//! - TOML-backed tax rules configuration

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod intake;
pub mod models;
pub mod money;
pub mod navigation;
pub mod planner;
pub mod rules;
pub mod tax;

pub use config::{SavingsMode, TaxConfig};
pub use dashboard::Dashboard;
pub use error::{Error, FieldError, Result, ValidationErrors};
pub use export::{ExportFormat, ExportReport};
pub use models::{
    AgeGroup, DeductionBreakdown, DerivationWarning, EmploymentType, FinancialProfile,
    InvestmentKind, Investments, InvestmentsInput, PolicySuggestion, ProfileInput,
    SuggestionCategory, TaxSummary,
};
pub use navigation::{NavSnapshot, Navigator, Phase, View};
pub use planner::{Analysis, TaxPlanner};
pub use rules::{RuleInfo, SuggestionEngine, SuggestionRule};
pub use tax::SummaryDerivation;
