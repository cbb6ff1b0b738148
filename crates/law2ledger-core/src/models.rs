//! Domain models for Law2Ledger

use serde::{Deserialize, Serialize};

/// Age band selected on the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To55 => "46-55",
            Self::Over55 => "55+",
        }
    }

    pub fn all() -> &'static [AgeGroup] {
        &[
            Self::From18To25,
            Self::From26To35,
            Self::From36To45,
            Self::From46To55,
            Self::Over55,
        ]
    }

    /// The oldest band is treated as senior for deduction limits
    pub fn is_senior(&self) -> bool {
        matches!(self, Self::Over55)
    }
}

impl std::str::FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "18-25" => Ok(Self::From18To25),
            "26-35" => Ok(Self::From26To35),
            "36-45" => Ok(Self::From36To45),
            "46-55" => Ok(Self::From46To55),
            "55+" => Ok(Self::Over55),
            _ => Err(format!("Unknown age group: {}", s)),
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment type selected on the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    Salaried,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    Government,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salaried => "Salaried",
            Self::SelfEmployed => "Self-employed",
            Self::Government => "Government",
        }
    }

    /// Longer label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Salaried => "Salaried Employee",
            Self::SelfEmployed => "Self-employed/Business",
            Self::Government => "Government Employee",
        }
    }

    pub fn all() -> &'static [EmploymentType] {
        &[Self::Salaried, Self::SelfEmployed, Self::Government]
    }

    /// Whether the salary structure includes a house rent allowance
    /// (and the standard deduction)
    pub fn is_salaried(&self) -> bool {
        matches!(self, Self::Salaried | Self::Government)
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "salaried" => Ok(Self::Salaried),
            "self-employed" | "self_employed" | "selfemployed" => Ok(Self::SelfEmployed),
            "government" => Ok(Self::Government),
            _ => Err(format!("Unknown employment type: {}", s)),
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Investment instruments tracked on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    Ppf,
    Elss,
    Nps,
    Other,
}

impl InvestmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ppf => "ppf",
            Self::Elss => "elss",
            Self::Nps => "nps",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppf => "PPF",
            Self::Elss => "ELSS",
            Self::Nps => "NPS",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [InvestmentKind] {
        &[Self::Ppf, Self::Elss, Self::Nps, Self::Other]
    }
}

/// Annual contributions per instrument (validated, non-negative)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Investments {
    ppf: f64,
    elss: f64,
    nps: f64,
    other: f64,
}

impl Investments {
    pub(crate) fn new(ppf: f64, elss: f64, nps: f64, other: f64) -> Self {
        Self {
            ppf,
            elss,
            nps,
            other,
        }
    }

    pub fn get(&self, kind: InvestmentKind) -> f64 {
        match kind {
            InvestmentKind::Ppf => self.ppf,
            InvestmentKind::Elss => self.elss,
            InvestmentKind::Nps => self.nps,
            InvestmentKind::Other => self.other,
        }
    }

    pub fn total(&self) -> f64 {
        self.ppf + self.elss + self.nps + self.other
    }
}

/// A validated financial profile.
///
/// Only produced by [`crate::intake::validate`]; every monetary field is
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    annual_income: f64,
    monthly_rent: f64,
    investments: Investments,
    insurance_premiums: f64,
    age_group: AgeGroup,
    employment_type: EmploymentType,
}

impl FinancialProfile {
    pub(crate) fn new(
        annual_income: f64,
        monthly_rent: f64,
        investments: Investments,
        insurance_premiums: f64,
        age_group: AgeGroup,
        employment_type: EmploymentType,
    ) -> Self {
        Self {
            annual_income,
            monthly_rent,
            investments,
            insurance_premiums,
            age_group,
            employment_type,
        }
    }

    pub fn annual_income(&self) -> f64 {
        self.annual_income
    }

    pub fn monthly_rent(&self) -> f64 {
        self.monthly_rent
    }

    pub fn annual_rent(&self) -> f64 {
        self.monthly_rent * 12.0
    }

    pub fn investments(&self) -> &Investments {
        &self.investments
    }

    pub fn insurance_premiums(&self) -> f64 {
        self.insurance_premiums
    }

    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    pub fn employment_type(&self) -> EmploymentType {
        self.employment_type
    }
}

/// Raw investments payload from the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentsInput {
    #[serde(default)]
    pub ppf: Option<f64>,
    #[serde(default)]
    pub elss: Option<f64>,
    #[serde(default)]
    pub nps: Option<f64>,
    #[serde(default)]
    pub other: Option<f64>,
}

/// Raw, unvalidated profile payload.
///
/// Missing numbers default to 0 and missing selections to empty, matching the
/// form's initial values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub investments: Option<InvestmentsInput>,
    #[serde(default)]
    pub insurance_premiums: Option<f64>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

/// Category badge for a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionCategory {
    Investment,
    Insurance,
    Allowance,
    Retirement,
    #[serde(rename = "Government Scheme")]
    GovernmentScheme,
}

impl SuggestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investment => "Investment",
            Self::Insurance => "Insurance",
            Self::Allowance => "Allowance",
            Self::Retirement => "Retirement",
            Self::GovernmentScheme => "Government Scheme",
        }
    }
}

impl std::fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tax-saving policy suggestion produced for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySuggestion {
    pub id: String,
    pub title: String,
    /// Human-readable estimate, e.g. "Save up to ₹46,800"
    pub estimated_savings: String,
    /// Same estimate in whole rupees
    pub estimated_amount: f64,
    /// Deduction limit not yet used by the profile
    pub unused_limit: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    pub category: SuggestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_link: Option<String>,
}

/// Before/after taxable income.
///
/// Invariant: `final_taxable_amount == current_taxable_income - potential_savings`
/// and all three values are non-negative. Use [`TaxSummary::clamped`] to build one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSummary {
    pub current_taxable_income: f64,
    pub potential_savings: f64,
    pub final_taxable_amount: f64,
}

impl TaxSummary {
    /// Build a summary, clamping savings so the final amount never goes negative.
    ///
    /// Returns a warning when the requested savings had to be reduced.
    pub fn clamped(current_taxable_income: f64, requested_savings: f64) -> (Self, Option<DerivationWarning>) {
        let current = current_taxable_income.max(0.0);
        let requested = requested_savings.max(0.0);
        let applied = requested.min(current);

        let warning = (applied < requested).then_some(DerivationWarning::SavingsExceedIncome {
            requested,
            applied,
        });

        (
            Self {
                current_taxable_income: current,
                potential_savings: applied,
                final_taxable_amount: current - applied,
            },
            warning,
        )
    }
}

/// Per-provision deduction amounts behind a derived summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionBreakdown {
    pub section_80c: f64,
    pub section_80ccd_1b: f64,
    pub section_80d: f64,
    pub hra_exemption: f64,
    pub section_80gg: f64,
    pub standard_deduction: f64,
}

impl DeductionBreakdown {
    pub fn total(&self) -> f64 {
        self.section_80c
            + self.section_80ccd_1b
            + self.section_80d
            + self.hra_exemption
            + self.section_80gg
            + self.standard_deduction
    }
}

/// Non-fatal issue found while deriving a summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivationWarning {
    /// Savings would have pushed the final taxable amount below zero
    SavingsExceedIncome { requested: f64, applied: f64 },
}

impl std::fmt::Display for DerivationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SavingsExceedIncome { requested, applied } => write!(
                f,
                "potential savings of {:.0} exceed taxable income; clamped to {:.0}",
                requested, applied
            ),
        }
    }
}
