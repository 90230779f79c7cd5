use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{bad_request, ApiError};
use crate::models::ApiResponse;
use crate::validation::CreateEventRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub location: Option<String>,
}

/// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!("Bad create payload: {}", rejection.body_text());
            return bad_request("Invalid request body");
        }
    };

    match state.events.create_event(request).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(ApiResponse::data(event).with_message("Event created successfully")),
        )
            .into_response(),
        Err(e) => ApiError::new(e, "Failed to create event. Please try again.").into_response(),
    }
}

/// GET /api/events?location=
async fn list_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!("Bad list query: {}", rejection.body_text());
            return bad_request("Invalid query parameters");
        }
    };

    match state.events.list_events(params.location.as_deref()).await {
        Ok(events) => Json(ApiResponse::list(events)).into_response(),
        Err(e) => ApiError::new(e, "Failed to fetch events. Please try again.").into_response(),
    }
}

/// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    // An id that is not even valid UTF-8 is still a malformed id.
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => {
            tracing::warn!("Bad event path: {}", rejection.body_text());
            return bad_request("Invalid event ID format");
        }
    };

    match state.events.get_event_by_id(&id).await {
        Ok(event) => Json(ApiResponse::data(event)).into_response(),
        Err(e) => ApiError::new(e, "Failed to fetch event. Please try again.").into_response(),
    }
}
