//! HTTP event ingestion

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;

use super::events::{CommerceEvent, EventOutcome};

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: String,
    pub outcome: EventOutcome,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/v1/events - Run the email subscriber for an event
#[tracing::instrument(
    name = "http.receive_event",
    skip(state, event),
    fields(event = %event.name)
)]
pub async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<CommerceEvent>,
) -> Result<Json<EventResponse>> {
    let name = event.name.clone();
    let outcome = state.subscriber.handle(event).await?;

    Ok(Json(EventResponse {
        event: name,
        outcome,
        timestamp: Utc::now(),
    }))
}
