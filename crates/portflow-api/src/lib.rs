//! # portflow-api — Axum API for Container Clearance Tracking
//!
//! HTTP surface over the [`portflow_clearance`] registry. Actions arrive from
//! collaborating systems (ingestion, customs authority, carrier feed,
//! inspection service, terminal operator); observers read snapshots, the
//! derived timeline, and the audit ledger.
//!
//! ## API Surface
//!
//! | Prefix                        | Module                  | Domain              |
//! |-------------------------------|-------------------------|---------------------|
//! | `/v1/containers/*`            | [`routes::containers`]  | Clearance lifecycle |
//! | `/openapi.json`               | [`openapi`]             | Spec                |
//! | `/health/*`                   | (this module)           | Probes              |
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) live outside the versioned surface.
/// Body size limit: 1 MiB. Clearance payloads are small JSON documents.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::containers::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the registry is accessible.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // The registry is in-memory; a length query exercises the map.
    let _ = state.registry.len();
    (StatusCode::OK, "ready").into_response()
}
