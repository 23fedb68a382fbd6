//! Liveness endpoint

use axum::{Json, Router, routing::get};
use chrono::Utc;

use datebook_core::store::protocol::HealthStatus;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
