pub mod events;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::EventError;
use crate::models::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(health::routes())
        .method_not_allowed_fallback(route_not_found)
}

/// Full application router: API under `/api`, banner, health and a JSON 404.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Event Discovery API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Route not found")))
}

/// 400 in the standard envelope, for requests rejected before the core.
pub fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message))).into_response()
}

/// An `EventError` bound to the message shown when storage fails for this
/// operation.
#[derive(Debug)]
pub struct ApiError {
    error: EventError,
    storage_message: &'static str,
}

impl ApiError {
    pub fn new(error: EventError, storage_message: &'static str) -> Self {
        Self {
            error,
            storage_message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            EventError::Validation(_) | EventError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            EventError::NotFound(_) => StatusCode::NOT_FOUND,
            EventError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.error {
            EventError::Validation(e) => e.message(),
            EventError::InvalidIdentifier(_) => "Invalid event ID format".to_string(),
            EventError::NotFound(_) => "Event not found".to_string(),
            EventError::StorageUnavailable(_) => self.storage_message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.error {
            EventError::StorageUnavailable(e) => tracing::error!("{}: {:?}", self.storage_message, e),
            EventError::Validation(e) => tracing::warn!("Rejected event: {}", e),
            other => tracing::debug!("{}", other),
        }

        (self.status(), Json(ApiResponse::failure(self.message()))).into_response()
    }
}
