//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PortFlow Clearance API",
        version = "0.1.0",
        description = "Container customs clearance tracking.\n\nProvides:\n- **Container registration** and snapshot retrieval\n- **Customs duty** assessment and payment with exact-amount matching\n- **Shipping progress** updates from the carrier feed\n- **Inspection** scheduling, start, and outcome recording\n- **Release** of cleared containers\n- **Derived timeline** of clearance milestones with a polling hint\n- **Audit ledger** per container, one entry per applied action",
        license(name = "BUSL-1.1"),
        contact(name = "PortFlow", url = "https://github.com/portflow/clearance")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Containers ──────────────────────────────────────────────────
        crate::routes::containers::create_container,
        crate::routes::containers::list_containers,
        crate::routes::containers::get_container,
        crate::routes::containers::mark_validated,
        crate::routes::containers::advance_shipping,
        crate::routes::containers::release_container,
        crate::routes::containers::get_timeline,
        crate::routes::containers::get_audit_log,
        // ── Customs ─────────────────────────────────────────────────────
        crate::routes::containers::assess_duty,
        crate::routes::containers::pay_duty,
        // ── Inspection ──────────────────────────────────────────────────
        crate::routes::containers::schedule_inspection,
        crate::routes::containers::begin_inspection,
        crate::routes::containers::complete_inspection,
    ),
    components(schemas(
        crate::routes::containers::CreateContainerRequest,
        crate::routes::containers::AssessDutyRequest,
        crate::routes::containers::PayDutyRequest,
        crate::routes::containers::AdvanceShippingRequest,
        crate::routes::containers::ScheduleInspectionRequest,
        crate::routes::containers::CompleteInspectionRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "containers", description = "Container lifecycle and queries"),
        (name = "customs", description = "Duty assessment and payment"),
        (name = "inspection", description = "Physical inspection workflow"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
