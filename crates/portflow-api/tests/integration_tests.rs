//! # Integration Tests for portflow-api
//!
//! Exercises the full clearance lifecycle over HTTP, the idempotent
//! duplicate-delivery behavior, the error mapping for rejected actions,
//! listing with filters, the derived timeline, and the audit ledger.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use portflow_api::config::ApiConfig;
use portflow_api::state::AppState;

/// Helper: build the test app with default configuration.
fn test_app() -> (axum::Router, AppState) {
    let state = AppState::new(ApiConfig::default());
    (portflow_api::app(state.clone()), state)
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: POST a JSON body and return the response.
async fn post_json(app: &axum::Router, uri: &str, body: Value) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: POST with an empty JSON body (actions that need no payload).
async fn post_empty(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: GET a uri and return the response.
async fn get(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper: register a container and return its id.
async fn create_container(app: &axum::Router, id: &str) -> Value {
    let response = post_json(
        app,
        "/v1/containers",
        json!({
            "container_id": id,
            "vessel_name": "MV Ever Forward",
            "importer_name": "Acme Imports Ltd",
            "port_of_loading": "Shanghai",
            "port_of_discharge": "Rotterdam",
            "cargo_description": "Machine parts",
            "cargo_weight": 18200.0
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Helper: drive a container to CUSTOMS_CLEARED (validate, assess, pay).
async fn clear_customs(app: &axum::Router, id: &str) {
    let response = post_empty(app, &format!("/v1/containers/{id}/validate")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        &format!("/v1/containers/{id}/duty"),
        json!({ "amount": { "currency": "USD", "minor_units": 250_000 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        &format!("/v1/containers/{id}/duty/pay"),
        json!({ "amount": { "currency": "USD", "minor_units": 250_000 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Helper: a calendar date safely in the future.
fn future_date() -> String {
    (Utc::now().date_naive() + Duration::days(7))
        .format("%Y-%m-%d")
        .to_string()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let (app, _) = test_app();
    let response = get(&app, "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_probe() {
    let (app, _) = test_app();
    let response = get(&app, "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Registration -------------------------------------------------------------

#[tokio::test]
async fn test_create_container_starts_pending() {
    let (app, _) = test_app();
    let body = create_container(&app, "MSCU1234567").await;
    assert_eq!(body["container_id"], "MSCU1234567");
    assert_eq!(body["overall_status"], "PENDING_VALIDATION");
    assert_eq!(body["customs_status"], "NOT_STARTED");
    assert_eq!(body["shipping_status"], "IN_TRANSIT");
    assert_eq!(body["inspection_status"], "NOT_STARTED");
    assert_eq!(body["vessel_name"], "MV Ever Forward");
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
    assert_eq!(body["logs"][0]["action"], "CONTAINER_CREATED");
}

#[tokio::test]
async fn test_create_duplicate_container_conflicts() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    let response = post_json(
        &app,
        "/v1/containers",
        json!({ "container_id": "MSCU1234567" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_container_rejects_blank_id() {
    let (app, _) = test_app();
    let response = post_json(&app, "/v1/containers", json!({ "container_id": "  " })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_unknown_container_is_404() {
    let (app, _) = test_app();
    let response = get(&app, "/v1/containers/NONE0000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// -- Customs ------------------------------------------------------------------

#[tokio::test]
async fn test_payment_clears_customs_when_validated() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;

    let response = get(&app, "/v1/containers/MSCU1234567").await;
    let body = body_json(response).await;
    assert_eq!(body["overall_status"], "CUSTOMS_CLEARED");
    assert_eq!(body["customs_status"], "PAID");
    assert_eq!(body["customs_duty_amount"]["minor_units"], 250_000);
}

#[tokio::test]
async fn test_payment_amount_mismatch_is_422_and_commits_nothing() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    post_empty(&app, "/v1/containers/MSCU1234567/validate").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/duty",
        json!({ "amount": { "currency": "USD", "minor_units": 250_000 } }),
    )
    .await;

    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/duty/pay",
        json!({ "amount": { "currency": "USD", "minor_units": 249_999 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AMOUNT_MISMATCH");

    // The failed payment must not appear in the ledger or move any axis.
    let snapshot = body_json(get(&app, "/v1/containers/MSCU1234567").await).await;
    assert_eq!(snapshot["customs_status"], "PENDING_PAYMENT");
    assert_eq!(snapshot["overall_status"], "VALIDATED");
    let actions: Vec<&str> = snapshot["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(!actions.contains(&"CUSTOMS_PAYMENT"));
}

#[tokio::test]
async fn test_duplicate_payment_is_a_noop() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;

    let before = body_json(get(&app, "/v1/containers/MSCU1234567").await).await;
    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/duty/pay",
        json!({ "amount": { "currency": "USD", "minor_units": 250_000 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let after = body_json(get(&app, "/v1/containers/MSCU1234567").await).await;
    assert_eq!(
        before["logs"].as_array().unwrap().len(),
        after["logs"].as_array().unwrap().len()
    );
    assert_eq!(after["customs_status"], "PAID");
}

// -- Shipping -----------------------------------------------------------------

#[tokio::test]
async fn test_shipping_advances_one_step_at_a_time() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;

    // Skipping ARRIVED is rejected.
    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/shipping",
        json!({ "status": "READY_FOR_PICKUP" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/shipping",
        json!({ "status": "ARRIVED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["shipping_status"], "ARRIVED");
}

// -- Inspection ---------------------------------------------------------------

#[tokio::test]
async fn test_schedule_before_customs_cleared_is_409() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_schedule_requires_future_date() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": today }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_inspection_flow_to_passed() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;

    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["overall_status"], "PENDING_INSPECTION");
    assert_eq!(body["inspection_status"], "SCHEDULED");

    let response = post_empty(&app, "/v1/containers/MSCU1234567/inspection/begin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["inspection_status"], "IN_PROGRESS");

    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/complete",
        json!({ "passed": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["inspection_status"], "PASSED");
    assert_eq!(body["overall_status"], "INSPECTION_PASSED");
}

#[tokio::test]
async fn test_failed_inspection_blocks_release() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    let response = post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/complete",
        json!({ "passed": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["overall_status"], "INSPECTION_FAILED");

    let response = post_empty(&app, "/v1/containers/MSCU1234567/release").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// -- Release ------------------------------------------------------------------

/// The full happy path: registration through release, with exactly one audit
/// entry per applied action.
#[tokio::test]
async fn test_full_lifecycle_to_release() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/shipping",
        json!({ "status": "ARRIVED" }),
    )
    .await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/shipping",
        json!({ "status": "READY_FOR_PICKUP" }),
    )
    .await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    post_empty(&app, "/v1/containers/MSCU1234567/inspection/begin").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/complete",
        json!({ "passed": true }),
    )
    .await;

    let response = post_empty(&app, "/v1/containers/MSCU1234567/release").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["overall_status"], "RELEASED");

    // create + validate + assess + pay + 2 shipping + schedule + begin
    // + complete + release = 10 ledger entries.
    assert_eq!(body["logs"].as_array().unwrap().len(), 10);
    let actions: Vec<&str> = body["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions.first(), Some(&"CONTAINER_CREATED"));
    assert_eq!(actions.last(), Some(&"CONTAINER_RELEASED"));
}

#[tokio::test]
async fn test_duplicate_release_is_a_noop() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/complete",
        json!({ "passed": true }),
    )
    .await;
    post_empty(&app, "/v1/containers/MSCU1234567/release").await;

    let before = body_json(get(&app, "/v1/containers/MSCU1234567").await).await;
    let response = post_empty(&app, "/v1/containers/MSCU1234567/release").await;
    assert_eq!(response.status(), StatusCode::OK);
    let after = body_json(get(&app, "/v1/containers/MSCU1234567").await).await;
    assert_eq!(before["logs"], after["logs"]);
    assert_eq!(after["overall_status"], "RELEASED");
}

// -- Listing ------------------------------------------------------------------

#[tokio::test]
async fn test_list_containers_with_status_filter() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1111111").await;
    create_container(&app, "MSCU2222222").await;
    clear_customs(&app, "MSCU2222222").await;

    let body = body_json(get(&app, "/v1/containers").await).await;
    assert_eq!(body["count"], 2);

    let body = body_json(get(&app, "/v1/containers?status=CUSTOMS_CLEARED").await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["containers"][0]["container_id"], "MSCU2222222");

    let body = body_json(get(&app, "/v1/containers?status=RELEASED").await).await;
    assert_eq!(body["count"], 0);
}

// -- Timeline -----------------------------------------------------------------

#[tokio::test]
async fn test_timeline_reflects_progress_and_polling_hint() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;

    let body = body_json(get(&app, "/v1/containers/MSCU1234567/timeline").await).await;
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0]["id"], "upload");
    assert_eq!(steps[0]["status"], "completed");
    assert_eq!(steps[1]["status"], "current");
    assert_eq!(steps[4]["status"], "pending");
    assert_eq!(body["poll_after_secs"], 5);

    clear_customs(&app, "MSCU1234567").await;
    let body = body_json(get(&app, "/v1/containers/MSCU1234567/timeline").await).await;
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps[2]["id"], "customs");
    assert_eq!(steps[2]["status"], "completed");
    assert_eq!(steps[3]["status"], "pending");
}

#[tokio::test]
async fn test_timeline_polling_stops_at_release() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    clear_customs(&app, "MSCU1234567").await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/schedule",
        json!({ "date": future_date() }),
    )
    .await;
    post_json(
        &app,
        "/v1/containers/MSCU1234567/inspection/complete",
        json!({ "passed": true }),
    )
    .await;
    post_empty(&app, "/v1/containers/MSCU1234567/release").await;

    let body = body_json(get(&app, "/v1/containers/MSCU1234567/timeline").await).await;
    assert_eq!(body["poll_after_secs"], Value::Null);
    let steps = body["steps"].as_array().unwrap();
    assert!(steps.iter().all(|s| s["status"] == "completed"));
}

// -- Audit ledger -------------------------------------------------------------

#[tokio::test]
async fn test_audit_log_endpoint() {
    let (app, _) = test_app();
    create_container(&app, "MSCU1234567").await;
    post_empty(&app, "/v1/containers/MSCU1234567/validate").await;

    let body = body_json(get(&app, "/v1/containers/MSCU1234567/logs").await).await;
    assert_eq!(body["container_id"], "MSCU1234567");
    assert_eq!(body["total"], 2);
    assert_eq!(body["logs"][0]["action"], "CONTAINER_CREATED");
    assert_eq!(body["logs"][1]["action"], "VALIDATED");
    assert!(body["logs"][1]["actor"].as_str().is_some());
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let (app, _) = test_app();
    let response = get(&app, "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "PortFlow Clearance API");
    assert!(body["paths"]["/v1/containers"].is_object());
}
