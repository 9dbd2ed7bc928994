//! Router for the event mutation API

use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::response::Json;
use axum::{Router, routing};
use http::StatusCode;

use super::public;
use crate::action::Assistant;
use crate::api::public::ApiError;
use crate::api::public::calendar::EventResponse;
use crate::api::state::AppState;
use crate::calendar::backend::NewEvent;
use crate::calendar::ops;

type SharedState = Arc<RwLock<AppState>>;

fn assistant(state: &SharedState) -> Arc<Assistant> {
    Arc::clone(&state.read().expect("Unable to read shared state").assistant)
}

/// Create an event on the primary calendar source.
async fn create_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let event = ops::create_event(
        assistant.reader(),
        NewEvent {
            title: body.title,
            description: body.description,
            location: body.location,
            start: body.start,
            end: body.end,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from_event(event, tz))))
}

async fn cancel_handler(
    State(state): State<SharedState>,
    Path((source_id, event_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let assistant = assistant(&state);
    ops::cancel_event_by_id(assistant.reader(), &source_id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reschedule_handler(
    State(state): State<SharedState>,
    Path((source_id, event_id)): Path<(String, String)>,
    Json(body): Json<public::RescheduleRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let event = ops::reschedule_event_by_id(
        assistant.reader(),
        &source_id,
        &event_id,
        body.start,
        body.end,
    )
    .await?;
    Ok(Json(EventResponse::from_event(event, tz)))
}

/// Create the events router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", routing::post(create_handler))
        .route(
            "/{source_id}/{event_id}",
            routing::delete(cancel_handler).patch(reschedule_handler),
        )
}
