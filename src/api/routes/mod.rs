//! API routes module

pub mod calendar;
pub mod chat;
pub mod events;

use std::sync::{Arc, RwLock};

use axum::Router;

use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Calendar read routes
        .nest("/calendar", calendar::router())
        // Event mutation routes
        .nest("/events", events::router())
        // Chat routes
        .nest("/chat", chat::router())
}
