//! Profile intake: validates raw form input into a [`FinancialProfile`]
//!
//! Every field is checked independently so the caller gets all field errors
//! from one submission, not just the first.

use tracing::debug;

use crate::error::{Result, ValidationErrors};
use crate::models::{
    AgeGroup, EmploymentType, FinancialProfile, InvestmentKind, Investments, ProfileInput,
};

/// Validate a raw profile payload.
///
/// Returns [`crate::Error::Validation`] carrying every failing field.
pub fn validate(input: &ProfileInput) -> Result<FinancialProfile> {
    let mut errors = ValidationErrors::new();

    let annual_income = amount(
        &mut errors,
        "annualIncome",
        "Annual income",
        input.annual_income,
    );
    let monthly_rent = amount(&mut errors, "monthlyRent", "Monthly rent", input.monthly_rent);
    let insurance_premiums = amount(
        &mut errors,
        "insurancePremiums",
        "Insurance premiums",
        input.insurance_premiums,
    );

    let raw_investments = input.investments.clone().unwrap_or_default();
    let mut contributions = [0.0; 4];
    for (slot, kind) in contributions.iter_mut().zip(InvestmentKind::all()) {
        let value = match kind {
            InvestmentKind::Ppf => raw_investments.ppf,
            InvestmentKind::Elss => raw_investments.elss,
            InvestmentKind::Nps => raw_investments.nps,
            InvestmentKind::Other => raw_investments.other,
        };
        let field = format!("investments.{}", kind.as_str());
        let label = format!("{} investment", kind.label());
        *slot = amount(&mut errors, &field, &label, value);
    }

    let age_group = selection::<AgeGroup>(
        &mut errors,
        "ageGroup",
        "Please select an age group",
        input.age_group.as_deref(),
    );
    let employment_type = selection::<EmploymentType>(
        &mut errors,
        "employmentType",
        "Please select employment type",
        input.employment_type.as_deref(),
    );

    if !errors.is_empty() {
        debug!(errors = %errors, "Profile rejected");
        return Err(errors.into());
    }

    // Both selections are Some when no errors were recorded
    let (Some(age_group), Some(employment_type)) = (age_group, employment_type) else {
        return Err(crate::Error::InvalidData(
            "profile selections missing after validation".to_string(),
        ));
    };

    let [ppf, elss, nps, other] = contributions;
    Ok(FinancialProfile::new(
        annual_income,
        monthly_rent,
        Investments::new(ppf, elss, nps, other),
        insurance_premiums,
        age_group,
        employment_type,
    ))
}

/// Check a monetary field; missing values count as 0
fn amount(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<f64>) -> f64 {
    let value = value.unwrap_or(0.0);
    if !value.is_finite() {
        errors.push(field, format!("{} must be a valid number", label));
        return 0.0;
    }
    if value < 0.0 {
        errors.push(field, format!("{} cannot be negative", label));
        return 0.0;
    }
    value
}

/// Check an enumerated selection; empty means "nothing selected"
fn selection<T>(
    errors: &mut ValidationErrors,
    field: &str,
    empty_message: &str,
    value: Option<&str>,
) -> Option<T>
where
    T: std::str::FromStr<Err = String>,
{
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            errors.push(field, empty_message);
            None
        }
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(field, e);
                None
            }
        },
    }
}
