//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::calendar::CalendarError;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response, mapping the
/// calendar error taxonomy onto HTTP status codes.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        let status = match self.0.downcast_ref::<CalendarError>() {
            Some(CalendarError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Some(CalendarError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(
                CalendarError::AllSourcesUnavailable
                | CalendarError::SourceUnavailable { .. }
                | CalendarError::Backend(_),
            ) => StatusCode::BAD_GATEWAY,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, format!("Something went wrong: {}", self.0)).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod calendar {
    pub use crate::api::routes::calendar::public::*;
}

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod events {
    pub use crate::api::routes::events::public::*;
}
