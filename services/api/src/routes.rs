use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use serde_json::json;
use showroom_leads::workflows::leads::{
    lead_router, IncidentLogger, LeadFactory, LeadRepository, ShowroomRepository,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_lead_routes<S, L, I>(factory: Arc<LeadFactory<S, L, I>>) -> axum::Router
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    lead_router(factory)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
