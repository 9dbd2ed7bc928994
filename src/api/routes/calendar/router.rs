//! Router for the calendar read API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};
use axum_extra::extract::Query;

use super::public;
use crate::action::Assistant;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::calendar::search::{DEFAULT_DAYS_BACK, DEFAULT_DAYS_FORWARD, search_events_by_text};
use crate::calendar::slots::{DEFAULT_SLOT_LIMIT, find_open_slots};

type SharedState = Arc<RwLock<AppState>>;

// Clone the assistant out of the lock so no guard is held across an
// await point
fn assistant(state: &SharedState) -> Arc<Assistant> {
    Arc::clone(&state.read().expect("Unable to read shared state").assistant)
}

async fn day_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::DayQuery>,
) -> Result<Json<Vec<public::EventResponse>>, ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let events = assistant.reader().list_events_for_day(params.date).await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| public::EventResponse::from_event(e, tz))
            .collect(),
    ))
}

async fn range_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::RangeQuery>,
) -> Result<Json<Vec<public::EventResponse>>, ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let (start, _) = crate::calendar::day_bounds(params.start, tz);
    let (_, end) = crate::calendar::day_bounds(params.end, tz);
    let events = assistant.reader().list_events(start, end).await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| public::EventResponse::from_event(e, tz))
            .collect(),
    ))
}

async fn slots_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::SlotsQuery>,
) -> Result<Json<Vec<public::SlotResponse>>, ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let slots = find_open_slots(
        assistant.reader(),
        params.date,
        params.duration,
        params.limit.unwrap_or(DEFAULT_SLOT_LIMIT),
        assistant.working_hours(),
    )
    .await?;
    Ok(Json(
        slots
            .into_iter()
            .map(|s| public::SlotResponse::from_slot(s, tz))
            .collect(),
    ))
}

async fn search_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::SearchQuery>,
) -> Result<Json<Vec<public::EventResponse>>, ApiError> {
    let assistant = assistant(&state);
    let tz = assistant.reader().tz();
    let events = search_events_by_text(
        assistant.reader(),
        &params.query,
        params.days_back.unwrap_or(DEFAULT_DAYS_BACK),
        params.days_forward.unwrap_or(DEFAULT_DAYS_FORWARD),
    )
    .await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| public::EventResponse::from_event(e, tz))
            .collect(),
    ))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/day", axum::routing::get(day_handler))
        .route("/range", axum::routing::get(range_handler))
        .route("/slots", axum::routing::get(slots_handler))
        .route("/search", axum::routing::get(search_handler))
}
