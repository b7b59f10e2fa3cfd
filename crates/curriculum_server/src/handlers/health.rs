//! Liveness probe.

use axum::Json;

use crate::schema::HealthResponse;

/// `GET /health`
///
/// Never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "server is running".to_string(),
        version: curriculum_core::core_version().to_string(),
    })
}
