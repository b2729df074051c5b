// SPDX-License-Identifier: BUSL-1.1
//! # Container Clearance Endpoints
//!
//! REST surface over the clearance registry. Writes are single
//! validate-then-commit actions; a failed action commits nothing, and a
//! duplicate delivery of an already-applied action returns the current
//! snapshot unchanged.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/containers` | `create_container` |
//! | `GET` | `/v1/containers` | `list_containers` |
//! | `GET` | `/v1/containers/:container_id` | `get_container` |
//! | `POST` | `/v1/containers/:container_id/validate` | `mark_validated` |
//! | `POST` | `/v1/containers/:container_id/duty` | `assess_duty` |
//! | `POST` | `/v1/containers/:container_id/duty/pay` | `pay_duty` |
//! | `POST` | `/v1/containers/:container_id/shipping` | `advance_shipping` |
//! | `POST` | `/v1/containers/:container_id/inspection/schedule` | `schedule_inspection` |
//! | `POST` | `/v1/containers/:container_id/inspection/begin` | `begin_inspection` |
//! | `POST` | `/v1/containers/:container_id/inspection/complete` | `complete_inspection` |
//! | `POST` | `/v1/containers/:container_id/release` | `release_container` |
//! | `GET` | `/v1/containers/:container_id/timeline` | `get_timeline` |
//! | `GET` | `/v1/containers/:container_id/logs` | `get_audit_log` |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use portflow_clearance::sync::{next_poll, PollPolicy};
use portflow_clearance::timeline::derive_timeline;
use portflow_clearance::{ContainerDetails, DutyAmount, OverallStatus, ShippingStatus};

use crate::error::AppError;
use crate::state::AppState;

// Default actors recorded in the audit ledger when the caller names none.
const INGESTION_ACTOR: &str = "ingestion-service";
const CUSTOMS_ACTOR: &str = "customs-authority";
const IMPORTER_ACTOR: &str = "importer-portal";
const CARRIER_ACTOR: &str = "carrier-feed";
const INSPECTION_ACTOR: &str = "inspection-service";
const TERMINAL_ACTOR: &str = "terminal-operator";

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request to register a freshly ingested container.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateContainerRequest {
    /// Carrier container number (e.g. "MSCU1234567").
    pub container_id: String,
    #[serde(default)]
    pub vessel_name: Option<String>,
    #[serde(default)]
    pub importer_name: Option<String>,
    #[serde(default)]
    pub port_of_loading: Option<String>,
    #[serde(default)]
    pub port_of_discharge: Option<String>,
    #[serde(default)]
    pub cargo_description: Option<String>,
    /// Gross cargo weight in kilograms.
    #[serde(default)]
    pub cargo_weight: Option<f64>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Request to assess the customs duty for a container.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AssessDutyRequest {
    /// Exact duty amount in integer minor units.
    #[schema(value_type = Object)]
    pub amount: DutyAmount,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Request to pay the assessed customs duty.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PayDutyRequest {
    /// Offered amount; must equal the assessed duty exactly.
    #[schema(value_type = Object)]
    pub amount: DutyAmount,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Request to record a carrier shipping update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AdvanceShippingRequest {
    /// Target shipping status, one forward step from the current one.
    #[schema(value_type = String)]
    pub status: ShippingStatus,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Request to schedule the physical inspection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ScheduleInspectionRequest {
    /// Inspection date; must be strictly in the future.
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Request to record the inspection outcome.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CompleteInspectionRequest {
    pub passed: bool,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Optional overall-status filter for listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListContainersQuery {
    pub status: Option<OverallStatus>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the container clearance router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/containers", post(create_container).get(list_containers))
        .route("/v1/containers/:container_id", get(get_container))
        .route("/v1/containers/:container_id/validate", post(mark_validated))
        .route("/v1/containers/:container_id/duty", post(assess_duty))
        .route("/v1/containers/:container_id/duty/pay", post(pay_duty))
        .route("/v1/containers/:container_id/shipping", post(advance_shipping))
        .route(
            "/v1/containers/:container_id/inspection/schedule",
            post(schedule_inspection),
        )
        .route(
            "/v1/containers/:container_id/inspection/begin",
            post(begin_inspection),
        )
        .route(
            "/v1/containers/:container_id/inspection/complete",
            post(complete_inspection),
        )
        .route("/v1/containers/:container_id/release", post(release_container))
        .route("/v1/containers/:container_id/timeline", get(get_timeline))
        .route("/v1/containers/:container_id/logs", get(get_audit_log))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/containers — Register a freshly ingested container.
#[utoipa::path(
    post,
    path = "/v1/containers",
    request_body = CreateContainerRequest,
    responses(
        (status = 201, description = "Container registered"),
        (status = 409, description = "Container id already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn create_container(
    State(state): State<AppState>,
    Json(req): Json<CreateContainerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let container_id = req.container_id.trim();
    if container_id.is_empty() {
        return Err(AppError::Validation("container_id must not be empty".to_string()));
    }
    let details = ContainerDetails {
        vessel_name: req.vessel_name,
        importer_name: req.importer_name,
        port_of_loading: req.port_of_loading,
        port_of_discharge: req.port_of_discharge,
        cargo_description: req.cargo_description,
        cargo_weight: req.cargo_weight,
    };
    let actor = req.actor.as_deref().unwrap_or(INGESTION_ACTOR);
    let container = state.registry.create_container(container_id, details, actor)?;
    tracing::info!(container_id, "container registered for clearance");
    Ok((StatusCode::CREATED, Json(container)))
}

/// GET /v1/containers — List containers, optionally filtered by overall status.
#[utoipa::path(
    get,
    path = "/v1/containers",
    params(
        ("status" = Option<String>, Query, description = "Overall status filter (e.g. RELEASED)"),
    ),
    responses(
        (status = 200, description = "Containers and count"),
    ),
    tag = "containers"
)]
async fn list_containers(
    State(state): State<AppState>,
    Query(query): Query<ListContainersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (containers, count) = state.registry.list(query.status);
    Ok(Json(serde_json::json!({ "containers": containers, "count": count })))
}

/// GET /v1/containers/:container_id — Full container snapshot including the
/// ordered audit log.
#[utoipa::path(
    get,
    path = "/v1/containers/{container_id}",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Container snapshot"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn get_container(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let container = state
        .registry
        .get(&container_id)
        .ok_or_else(|| AppError::NotFound(format!("container {container_id} not found")))?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/validate — Record the
/// document-validation outcome.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/validate",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Container validated (or already validated)"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn mark_validated(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let container = state.registry.mark_validated(&container_id, INGESTION_ACTOR)?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/duty — Record the customs duty assessment.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/duty",
    params(("container_id" = String, Path, description = "Carrier container number")),
    request_body = AssessDutyRequest,
    responses(
        (status = 200, description = "Duty assessed, payment pending"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "Duty already assessed", body = crate::error::ErrorBody),
    ),
    tag = "customs"
)]
async fn assess_duty(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
    Json(req): Json<AssessDutyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = req.actor.as_deref().unwrap_or(CUSTOMS_ACTOR);
    let container = state.registry.assess_customs_duty(&container_id, req.amount, actor)?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/duty/pay — Pay the assessed customs duty.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/duty/pay",
    params(("container_id" = String, Path, description = "Carrier container number")),
    request_body = PayDutyRequest,
    responses(
        (status = 200, description = "Duty paid; customs cleared when validated"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "Payment not currently possible", body = crate::error::ErrorBody),
        (status = 422, description = "Amount mismatch", body = crate::error::ErrorBody),
    ),
    tag = "customs"
)]
async fn pay_duty(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
    Json(req): Json<PayDutyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = req.actor.as_deref().unwrap_or(IMPORTER_ACTOR);
    let container = state.registry.pay_customs_duty(&container_id, req.amount, actor)?;
    tracing::info!(container_id, overall = %container.overall_status, "customs duty paid");
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/shipping — Record a carrier shipping update.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/shipping",
    params(("container_id" = String, Path, description = "Carrier container number")),
    request_body = AdvanceShippingRequest,
    responses(
        (status = 200, description = "Shipping status advanced"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "Not one forward step", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn advance_shipping(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
    Json(req): Json<AdvanceShippingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = req.actor.as_deref().unwrap_or(CARRIER_ACTOR);
    let container = state.registry.advance_shipping(&container_id, req.status, actor)?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/inspection/schedule — Book the physical
/// inspection.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/inspection/schedule",
    params(("container_id" = String, Path, description = "Carrier container number")),
    request_body = ScheduleInspectionRequest,
    responses(
        (status = 200, description = "Inspection scheduled"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "Container not ready for inspection", body = crate::error::ErrorBody),
    ),
    tag = "inspection"
)]
async fn schedule_inspection(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
    Json(req): Json<ScheduleInspectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = req.actor.as_deref().unwrap_or(IMPORTER_ACTOR);
    let container = state.registry.schedule_inspection(&container_id, req.date, actor)?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/inspection/begin — Record that the
/// inspector has started work.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/inspection/begin",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Inspection in progress"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "No scheduled inspection", body = crate::error::ErrorBody),
    ),
    tag = "inspection"
)]
async fn begin_inspection(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let container = state.registry.begin_inspection(&container_id, INSPECTION_ACTOR)?;
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/inspection/complete — Record the
/// inspection outcome.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/inspection/complete",
    params(("container_id" = String, Path, description = "Carrier container number")),
    request_body = CompleteInspectionRequest,
    responses(
        (status = 200, description = "Outcome recorded"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "No inspection to complete", body = crate::error::ErrorBody),
    ),
    tag = "inspection"
)]
async fn complete_inspection(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
    Json(req): Json<CompleteInspectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = req.actor.as_deref().unwrap_or(INSPECTION_ACTOR);
    let container = state
        .registry
        .complete_inspection(&container_id, req.passed, actor)?;
    tracing::info!(
        container_id,
        passed = req.passed,
        overall = %container.overall_status,
        "inspection completed"
    );
    Ok(Json(container))
}

/// POST /v1/containers/:container_id/release — Release the container for pickup.
#[utoipa::path(
    post,
    path = "/v1/containers/{container_id}/release",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Container released (idempotent)"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
        (status = 409, description = "Inspection not passed", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn release_container(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let container = state.registry.release_container(&container_id, TERMINAL_ACTOR)?;
    tracing::info!(container_id, "container released");
    Ok(Json(container))
}

/// GET /v1/containers/:container_id/timeline — Derived progress timeline.
///
/// Also advertises the polling contract: `poll_after_secs` is absent once
/// the container is released and the observer should stop polling.
#[utoipa::path(
    get,
    path = "/v1/containers/{container_id}/timeline",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Milestone steps and polling hint"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn get_timeline(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let container = state
        .registry
        .get(&container_id)
        .ok_or_else(|| AppError::NotFound(format!("container {container_id} not found")))?;
    let steps = derive_timeline(&container);
    let policy = PollPolicy {
        interval: state.config.poll_interval,
    };
    let poll_after_secs = next_poll(&policy, &container).map(|d| d.as_secs());
    Ok(Json(serde_json::json!({
        "container_id": container.container_id,
        "overall_status": container.overall_status,
        "steps": steps,
        "poll_after_secs": poll_after_secs,
    })))
}

/// GET /v1/containers/:container_id/logs — Audit ledger in insertion order.
#[utoipa::path(
    get,
    path = "/v1/containers/{container_id}/logs",
    params(("container_id" = String, Path, description = "Carrier container number")),
    responses(
        (status = 200, description = "Audit entries in insertion order"),
        (status = 404, description = "Container not found", body = crate::error::ErrorBody),
    ),
    tag = "containers"
)]
async fn get_audit_log(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let logs = state.registry.audit_log(&container_id)?;
    Ok(Json(serde_json::json!({
        "container_id": container_id,
        "logs": logs,
        "total": logs.len(),
    })))
}
