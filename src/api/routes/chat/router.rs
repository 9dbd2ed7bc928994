//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json, routing};
use chrono::Utc;
use uuid::Uuid;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::dialogue::handle_message;

type SharedState = Arc<RwLock<AppState>>;

async fn chat_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let (assistant, classifier, pending) = {
        let shared = state.read().expect("Unable to read shared state");
        (
            Arc::clone(&shared.assistant),
            Arc::clone(&shared.classifier),
            Arc::clone(&shared.pending),
        )
    };

    let conversation_id = body
        .conversation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let text = handle_message(
        &assistant,
        classifier.as_ref(),
        &pending,
        &conversation_id,
        &body.message,
        Utc::now(),
    )
    .await?;

    Ok(Json(public::ChatResponse {
        conversation_id,
        text,
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", routing::post(chat_handler))
}
