//! Rule catalog handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::AppState;
use law2ledger_core::rules::RuleInfo;

/// GET /api/rules - List the registered suggestion rules
pub async fn list_rules(State(state): State<Arc<AppState>>) -> Json<Vec<RuleInfo>> {
    Json(state.planner.rules())
}
