//! Summary export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use law2ledger_core::ExportFormat;

/// Query parameters for summary export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub session: Option<String>,
    /// Output format (default: txt)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "txt".to_string()
}

/// GET /api/export-summary - Download the tax summary of a session
pub async fn export_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format: ExportFormat = params
        .format
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let session_id = params
        .session
        .ok_or_else(|| AppError::not_found("No profile has been submitted"))?;

    let report = state
        .sessions
        .read(&session_id, |d| d.export(format, Utc::now()))
        .await
        .ok_or_else(|| AppError::not_found("Session not found"))?
        .map_err(AppError::from_core)?;

    let file_name = report.file_name();
    info!(session = %session_id, file = %file_name, "Exported tax summary");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(report.body))
        .map_err(|e| AppError::internal(&e.to_string()))
}
