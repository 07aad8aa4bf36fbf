use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use super::domain::{LeadId, LeadView};
use super::factory::LeadFactory;
use super::incident::IncidentLogger;
use super::payload::user_from_payload;
use super::repository::{LeadRepository, ShowroomRepository};
use super::validation::{require_keys, LEAD_KEYS};
use crate::error::AppError;

/// Router builder exposing lead intake and lookup endpoints.
pub fn lead_router<S, L, I>(factory: Arc<LeadFactory<S, L, I>>) -> Router
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(create_handler::<S, L, I>))
        .route("/api/v1/leads/:lead_id", get(fetch_handler::<S, L, I>))
        .with_state(factory)
}

pub(crate) async fn create_handler<S, L, I>(
    State(factory): State<Arc<LeadFactory<S, L, I>>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<LeadView>), AppError>
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    // The acting user travels inside the payload, so the top-level shape is checked before
    // the user can be built.
    require_keys(&payload, LEAD_KEYS)?;
    let user = user_from_payload(&payload["user"])?;

    let submission = factory.submit(&user, &payload)?;
    let status = if submission.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(submission.lead().view())))
}

pub(crate) async fn fetch_handler<S, L, I>(
    State(factory): State<Arc<LeadFactory<S, L, I>>>,
    Path(lead_id): Path<String>,
) -> Result<Json<LeadView>, AppError>
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    let lead = factory.lead(&LeadId(lead_id))?;
    Ok(Json(lead.view()))
}
