//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{CampaignSummary, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/milestones/:index/events", get(get_milestone_events))
        .route("/actors/:address/events", get(get_actor_events))
        .route("/campaign/summary", get(get_campaign_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MilestoneEventsResponse {
    pub milestone: i64,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct ActorEventsResponse {
    pub actor: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Stored event type, e.g. `donation_received`.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

fn internal_error(e: IndexerError) -> Response {
    error!("API query failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events[?type=<event_type>]`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EventsQuery>,
) -> Response {
    match db::get_all_events(&state.pool, query.event_type.as_deref()).await {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(AllEventsResponse { count, events })).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /milestones/:index/events`
///
/// Posting, votes and the payout of one milestone.
pub async fn get_milestone_events(
    State(state): State<Arc<ApiState>>,
    Path(milestone): Path<i64>,
) -> Response {
    match db::get_events_for_milestone(&state.pool, milestone).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(MilestoneEventsResponse {
                    milestone,
                    count,
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /actors/:address/events`
pub async fn get_actor_events(
    State(state): State<Arc<ApiState>>,
    Path(actor): Path<String>,
) -> Response {
    match db::get_events_for_actor(&state.pool, &actor).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(ActorEventsResponse {
                    actor,
                    count,
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /campaign/summary`
///
/// Totals folded from the whole indexed history.
pub async fn get_campaign_summary(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool, None).await {
        Ok(events) => (StatusCode::OK, Json(CampaignSummary::from_records(&events))).into_response(),
        Err(e) => internal_error(e),
    }
}
