//! Law2Ledger Web Server
//!
//! Axum-based REST API for the Law2Ledger tax planning dashboard.
//!
//! - Restrictive CORS policy
//! - Request timeout on every route
//! - Sanitized error responses with field-level validation details

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use law2ledger_core::{FieldError, TaxPlanner};

mod handlers;
mod sessions;

pub use sessions::{SessionManager, SESSION_TIMEOUT};

/// Environment variable holding a comma-separated list of allowed CORS origins
pub const ALLOWED_ORIGINS_ENV_VAR: &str = "LAW2LEDGER_ALLOWED_ORIGINS";

/// Default request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Upper bound on handling one request
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Parse a comma-separated list of CORS origins
pub fn parse_allowed_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let valid = s.parse::<HeaderValue>().is_ok();
            if !valid {
                warn!(origin = *s, "Ignoring invalid CORS origin");
            }
            valid
        })
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub planner: TaxPlanner,
    pub sessions: Arc<SessionManager>,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(planner: TaxPlanner, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_sessions(planner, static_dir, config, Arc::new(SessionManager::new()))
}

/// Create the application router around a shared session manager (for testing)
pub fn create_router_with_sessions(
    planner: TaxPlanner,
    static_dir: Option<&str>,
    config: ServerConfig,
    sessions: Arc<SessionManager>,
) -> Router {
    let request_timeout = config.request_timeout;

    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let state = Arc::new(AppState {
        planner,
        sessions,
        config,
    });

    let api_routes = Router::new()
        // Intake
        .route("/profile", post(handlers::submit_profile))
        // Export
        .route("/export-summary", get(handlers::export_summary))
        // Navigation
        .route("/session/:id", get(handlers::get_session))
        .route("/session/:id/view", post(handlers::select_view))
        // Rule catalog
        .route("/rules", get(handlers::list_rules));

    // CSP: restrict scripts to same-origin, allow inline styles for the chart bundle
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    planner: TaxPlanner,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!(
        mode = planner.config().savings_mode.as_str(),
        rules = planner.rules().len(),
        "Tax rules loaded"
    );
    if config.allowed_origins.is_empty() {
        info!("ℹ️  CORS restricted to same-origin (set {} to allow others)", ALLOWED_ORIGINS_ENV_VAR);
    }

    let app = create_router(planner, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    fields: Option<Vec<FieldError>>,
    internal: Option<anyhow::Error>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            fields: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    /// 400 carrying every failing field
    pub fn validation(errors: &law2ledger_core::ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Profile validation failed".to_string(),
            fields: Some(errors.fields().to_vec()),
            internal: None,
        }
    }

    /// Map a core error onto its HTTP status
    pub fn from_core(err: law2ledger_core::Error) -> Self {
        use law2ledger_core::Error;

        match err {
            Error::Validation(errors) => Self::validation(&errors),
            Error::ExportPrecondition(msg) => Self::not_found(&format!("Export unavailable: {}", msg)),
            Error::Navigation(msg) => Self::conflict(&msg),
            Error::SubmissionPending => Self::conflict(&Error::SubmissionPending.to_string()),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(ErrorBody {
            error: &self.message,
            fields: self.fields.as_deref(),
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            fields: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
