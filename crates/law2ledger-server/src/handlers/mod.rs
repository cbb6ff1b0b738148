//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod export;
pub mod profile;
pub mod rules;
pub mod session;

// Re-export all handlers for use in router
pub use export::*;
pub use profile::*;
pub use rules::*;
pub use session::*;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::AppError;

/// Unwrap a JSON body, turning malformed payloads into a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(&rejection.body_text()))
}
