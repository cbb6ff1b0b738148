//! Profile intake handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::{AppError, AppState};
use law2ledger_core::{
    DeductionBreakdown, DerivationWarning, PolicySuggestion, ProfileInput, TaxSummary, View,
};

/// Optional session selector shared by session-scoped endpoints
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}

/// Result of a successful submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub session_id: String,
    pub view: View,
    pub suggestions: Vec<PolicySuggestion>,
    pub tax_summary: TaxSummary,
    pub deductions: DeductionBreakdown,
    pub warnings: Vec<DerivationWarning>,
}

/// POST /api/profile - Validate a profile and derive suggestions and summary
///
/// Without `?session=` a new session is created, but only once the profile
/// is accepted. A rejected profile on an existing session keeps its previous
/// analysis and view.
pub async fn submit_profile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionQuery>,
    payload: Result<Json<ProfileInput>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let input = json_body(payload)?;

    // Derivation is synchronous, so it runs before any session is touched
    let result = state.planner.intake(&input);

    let (session_id, result) = match params.session {
        Some(id) => (id, result),
        None => {
            let analysis = result.map_err(AppError::from_core)?;
            (state.sessions.create().await, Ok(analysis))
        }
    };

    // Begin and finish under one write lock: a dropped request can never
    // leave the session in the loading phase
    let response = state
        .sessions
        .update(&session_id, |d| -> law2ledger_core::Result<SubmitResponse> {
            d.begin_submission()?;
            let analysis = d.finish_submission(result)?;
            let suggestions = analysis.suggestions.clone();
            let derivation = analysis.derivation.clone();
            Ok(SubmitResponse {
                session_id: session_id.clone(),
                view: d.view(),
                suggestions,
                tax_summary: derivation.summary,
                deductions: derivation.deductions,
                warnings: derivation.warnings,
            })
        })
        .await
        .ok_or_else(|| AppError::not_found("Session not found"))?
        .map_err(AppError::from_core)?;

    info!(
        session = %response.session_id,
        suggestions = response.suggestions.len(),
        "Profile accepted"
    );

    Ok(Json(response))
}
