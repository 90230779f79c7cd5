use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running!",
        timestamp: Utc::now(),
    })
}
