//! Dashboard navigation handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::json_body;
use crate::{AppError, AppState};
use law2ledger_core::{NavSnapshot, View};

/// Navigation state of a session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub navigation: NavSnapshot,
    /// Whether an export is available
    pub has_summary: bool,
}

/// Request to switch tabs
#[derive(Debug, Deserialize)]
pub struct SelectViewRequest {
    pub view: View,
}

/// GET /api/session/:id - Current tab, phase and unlocked tabs
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let (navigation, has_summary) = state
        .sessions
        .read(&session_id, |d| (d.navigation(), d.analysis().is_some()))
        .await
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    Ok(Json(SessionResponse {
        session_id,
        navigation,
        has_summary,
    }))
}

/// POST /api/session/:id/view - Switch to another tab
///
/// Returns 409 when the tab is still locked.
pub async fn select_view(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    payload: Result<Json<SelectViewRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let request = json_body(payload)?;

    let (navigation, has_summary) = state
        .sessions
        .update(&session_id, |d| {
            d.select(request.view)
                .map(|_| (d.navigation(), d.analysis().is_some()))
        })
        .await
        .ok_or_else(|| AppError::not_found("Session not found"))?
        .map_err(AppError::from_core)?;

    debug!(session = %session_id, view = navigation.view.as_str(), "View selected");

    Ok(Json(SessionResponse {
        session_id,
        navigation,
        has_summary,
    }))
}
