//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State};
use utoipa::ToSchema;

use super::super::state::AppState;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "ok")]
    pub status: String,
    /// Configured broker adapter
    #[schema(example = "memory")]
    pub broker: String,
    /// Build commit
    #[schema(example = "a1b2c3d")]
    pub build: String,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
}

/// Health check endpoint
///
/// Liveness only: the broker is not called, so a broker outage does not
/// flip this to unhealthy.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        broker: state.broker.name().to_string(),
        build: env!("GIT_HASH").to_string(),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    })
}
