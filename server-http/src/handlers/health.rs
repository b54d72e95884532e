use crate::models::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    Ok(Json(HealthResponse {
        message: "OK".into(),
        cache_backend: state.cache_backend.into(),
    }))
}
