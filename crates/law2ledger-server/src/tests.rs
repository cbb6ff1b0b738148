//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router(TaxPlanner::default(), None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn reference_profile() -> serde_json::Value {
    serde_json::json!({
        "annualIncome": 1200000,
        "monthlyRent": 25000,
        "investments": { "ppf": 150000, "elss": 50000, "nps": 50000, "other": 25000 },
        "insurancePremiums": 50000,
        "ageGroup": "26-35",
        "employmentType": "Salaried"
    })
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Submit the reference profile and return the new session ID
async fn submit_reference(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/profile", &reference_profile()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    json["sessionId"].as_str().unwrap().to_string()
}

// ========== Profile API Tests ==========

#[tokio::test]
async fn test_submit_reference_profile() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/profile", &reference_profile()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["sessionId"].as_str().unwrap().starts_with("l2l_"));
    assert_eq!(json["view"], "suggestions");
    assert!(!json["suggestions"].as_array().unwrap().is_empty());
    assert_eq!(json["taxSummary"]["currentTaxableIncome"], 1200000.0);
    assert_eq!(json["taxSummary"]["potentialSavings"], 515000.0);
    assert_eq!(json["taxSummary"]["finalTaxableAmount"], 685000.0);
    assert_eq!(json["deductions"]["hraExemption"], 240000.0);
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_negative_income() {
    let app = setup_test_app();

    let mut profile = reference_profile();
    profile["annualIncome"] = serde_json::json!(-1);

    let response = app
        .oneshot(post_json("/api/profile", &profile))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Profile validation failed");
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["field"], "annualIncome");
    assert_eq!(fields[0]["message"], "Annual income cannot be negative");
    assert!(json.get("taxSummary").is_none());
}

#[tokio::test]
async fn test_submit_empty_selections() {
    let app = setup_test_app();

    let mut profile = reference_profile();
    profile["ageGroup"] = serde_json::json!("");
    profile["employmentType"] = serde_json::json!("");

    let response = app
        .oneshot(post_json("/api/profile", &profile))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"ageGroup"));
    assert!(fields.contains(&"employmentType"));
}

#[tokio::test]
async fn test_submit_malformed_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/profile")
                .header("content-type", "application/json")
                .body(Body::from("{\"annualIncome\": \"lots\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_unknown_session() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/profile?session=l2l_doesnotexist",
            &reference_profile(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resubmit_same_session() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let mut profile = reference_profile();
    profile["employmentType"] = serde_json::json!("Self-employed");

    let response = app
        .oneshot(post_json(
            &format!("/api/profile?session={}", session_id),
            &profile,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["sessionId"], session_id.as_str());
    let ids: Vec<&str> = json["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"section_80gg"));
    assert!(!ids.contains(&"hra_exemption"));
}

#[tokio::test]
async fn test_submission_while_pending_conflicts() {
    let sessions = Arc::new(SessionManager::new());
    let session_id = sessions.create().await;
    sessions
        .update(&session_id, |d| d.begin_submission())
        .await
        .unwrap()
        .unwrap();

    let app = create_router_with_sessions(
        TaxPlanner::default(),
        None,
        ServerConfig::default(),
        sessions,
    );

    let response = app
        .oneshot(post_json(
            &format!("/api/profile?session={}", session_id),
            &reference_profile(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rejected_anonymous_submission_creates_no_session() {
    let sessions = Arc::new(SessionManager::new());
    let app = create_router_with_sessions(
        TaxPlanner::default(),
        None,
        ServerConfig::default(),
        sessions.clone(),
    );

    let mut profile = reference_profile();
    profile["annualIncome"] = serde_json::json!(-1);

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(post_json("/api/profile", &profile))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert!(json.get("sessionId").is_none());
    }
    assert_eq!(sessions.count().await, 0);

    submit_reference(&app).await;
    assert_eq!(sessions.count().await, 1);
}

#[tokio::test]
async fn test_rejected_resubmission_keeps_session_usable() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;
    let uri = format!("/api/profile?session={}", session_id);

    let mut invalid = reference_profile();
    invalid["ageGroup"] = serde_json::json!("");
    let response = app.clone().oneshot(post_json(&uri, &invalid)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Previous analysis and view survive, and the session is not left loading
    let response = app
        .clone()
        .oneshot(get(&format!("/api/session/{}", session_id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["phase"], "ready");
    assert_eq!(json["view"], "suggestions");
    assert_eq!(json["hasSummary"], true);

    let response = app
        .oneshot(post_json(&uri, &reference_profile()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_never_conflict() {
    let sessions = Arc::new(SessionManager::new());
    let app = create_router_with_sessions(
        TaxPlanner::default(),
        None,
        ServerConfig::default(),
        sessions.clone(),
    );
    let session_id = submit_reference(&app).await;
    let uri = format!("/api/profile?session={}", session_id);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let app = app.clone();
            let uri = uri.clone();
            tokio::spawn(async move {
                app.oneshot(post_json(&uri, &reference_profile()))
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(sessions.read(&session_id, |d| d.is_pending()).await, Some(false));
}

// ========== Export API Tests ==========

#[tokio::test]
async fn test_export_summary_text() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let response = app
        .oneshot(get(&format!("/api/export-summary?session={}", session_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Law2Ledger-Tax-Summary-"));
    assert!(disposition.ends_with(".txt\""));

    let body = get_body_text(response).await;
    assert!(body.contains("Annual Income: ₹12,00,000"));
    assert!(body.contains("RECOMMENDED POLICIES"));
}

#[tokio::test]
async fn test_export_summary_json() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let response = app
        .oneshot(get(&format!(
            "/api/export-summary?session={}&format=json",
            session_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["taxSummary"]["finalTaxableAmount"], 685000.0);
}

#[tokio::test]
async fn test_export_without_session() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/export-summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_before_submission() {
    let sessions = Arc::new(SessionManager::new());
    let session_id = sessions.create().await;
    let app = create_router_with_sessions(
        TaxPlanner::default(),
        None,
        ServerConfig::default(),
        sessions,
    );

    let response = app
        .oneshot(get(&format!("/api/export-summary?session={}", session_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Export unavailable"));
}

#[tokio::test]
async fn test_export_invalid_format() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let response = app
        .oneshot(get(&format!(
            "/api/export-summary?session={}&format=pdf",
            session_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Navigation API Tests ==========

#[tokio::test]
async fn test_session_navigation_state() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let response = app
        .oneshot(get(&format!("/api/session/{}", session_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["view"], "suggestions");
    assert_eq!(json["phase"], "ready");
    assert_eq!(
        json["unlocked"],
        serde_json::json!(["profile", "suggestions", "visual"])
    );
    assert_eq!(json["hasSummary"], true);
}

#[tokio::test]
async fn test_select_view_after_submission() {
    let app = setup_test_app();
    let session_id = submit_reference(&app).await;

    let response = app
        .oneshot(post_json(
            &format!("/api/session/{}/view", session_id),
            &serde_json::json!({ "view": "visual" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["view"], "visual");
}

#[tokio::test]
async fn test_locked_view_conflicts() {
    let sessions = Arc::new(SessionManager::new());
    let session_id = sessions.create().await;
    let app = create_router_with_sessions(
        TaxPlanner::default(),
        None,
        ServerConfig::default(),
        sessions,
    );

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/session/{}/view", session_id),
            &serde_json::json!({ "view": "suggestions" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(get(&format!("/api/session/{}", session_id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["view"], "profile");
    assert_eq!(json["unlocked"], serde_json::json!(["profile"]));
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/session/l2l_doesnotexist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Rules API Tests ==========

#[tokio::test]
async fn test_list_rules() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/rules")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let rules = json.as_array().unwrap();
    assert_eq!(rules.len(), 6);
    assert_eq!(rules[0]["id"], "section_80c");
    assert_eq!(rules[0]["category"], "Investment");
}

// ========== Middleware Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/rules")).await.unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("content-security-policy"));
}

#[test]
fn test_parse_allowed_origins() {
    let origins = parse_allowed_origins(" http://localhost:5173, ,https://tax.example.com ");
    assert_eq!(
        origins,
        vec![
            "http://localhost:5173".to_string(),
            "https://tax.example.com".to_string()
        ]
    );
    assert!(parse_allowed_origins("").is_empty());
}
