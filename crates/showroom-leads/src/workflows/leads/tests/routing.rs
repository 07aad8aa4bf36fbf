use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::leads::router::{create_handler, fetch_handler};
use crate::workflows::leads::LeadFactory;

fn post_lead(payload: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/leads")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn create_route_returns_created_lead_view() {
    let (factory, _, _, _) = build_factory();
    let router = lead_router_with_factory(factory);

    let response = router
        .oneshot(post_lead(&payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["lead_id"], json!("lead-000001"));
    assert_eq!(body["showroom_id"], json!("1"));
    assert_eq!(body["event_type"], json!("wedding"));
    assert_eq!(body["country"], json!("Spain"));
    assert!(body.get("phone").is_none(), "contact details stay private");
}

#[tokio::test]
async fn resubmitted_lead_is_answered_with_ok_and_the_stored_twin() {
    let (factory, _, leads, _) = build_factory();
    let router = lead_router_with_factory(factory);

    let first = router
        .clone()
        .oneshot(post_lead(&payload()))
        .await
        .expect("route executes");
    let second = router
        .oneshot(post_lead(&payload()))
        .await
        .expect("route executes");

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::OK);
    let body = read_json_body(second).await;
    assert_eq!(body["lead_id"], json!("lead-000001"));
    assert_eq!(leads.saves(), 1);
}

#[tokio::test]
async fn create_route_rejects_unknown_showroom() {
    let (factory, _, _, incidents) = build_factory();
    let router = lead_router_with_factory(factory);
    let mut payload = payload();
    payload["showroom"]["id"] = json!("404");

    let response = router
        .oneshot(post_lead(&payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("Showroom not found"));
    assert_eq!(incidents.messages().len(), 1);
}

#[tokio::test]
async fn create_handler_checks_top_level_keys_before_building_user() {
    let (factory, showrooms, _, _) = build_factory();
    let factory = Arc::new(factory);
    let payload = without(payload(), &[], "user");

    let response = create_handler(State(factory), axum::Json(payload))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("`user`"));
    assert_eq!(showrooms.lookups(), 0);
}

#[tokio::test]
async fn create_handler_rejects_incomplete_personal_information() {
    let (factory, _, leads, _) = build_factory();
    let mut payload = payload();
    payload["user"]["phone"] = json!("");

    let response = create_handler(State(Arc::new(factory)), axum::Json(payload))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(read_json_body(response).await["error"], json!("Required"));
    assert_eq!(leads.saves(), 0);
}

#[tokio::test]
async fn create_handler_returns_internal_error_on_repository_failure() {
    let factory = LeadFactory::new(
        Arc::new(MemoryShowrooms::with(vec![showroom()])),
        Arc::new(UnavailableLeads),
        Arc::new(RecordingIncidents::default()),
    );

    let response = create_handler(State(Arc::new(factory)), axum::Json(payload()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn fetch_handler_returns_stored_leads() {
    let (factory, _, _, _) = build_factory();
    let factory = Arc::new(factory);
    let lead = factory
        .create_lead(&user(), &payload())
        .expect("lead created");
    let lead_id = lead.id().expect("stored lead has id").0.clone();

    let response = fetch_handler(State(factory.clone()), Path(lead_id.clone()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["lead_id"], json!(lead_id));
}

#[tokio::test]
async fn fetch_route_returns_not_found_for_unknown_leads() {
    let (factory, _, _, _) = build_factory();
    let router = lead_router_with_factory(factory);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/leads/lead-999999")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("record not found"));
}
