//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, error_codes};

/// Health check response data
#[derive(serde::Serialize)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Build revision
    pub version: &'static str,
}

/// GET /api/v1/health
///
/// Pings PostgreSQL when configured. Failures are logged but not exposed:
/// the client only sees 503.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<HealthResponse>>> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    if let Some(db) = &state.pg_db {
        if let Err(e) = db.health_check().await {
            tracing::error!(error = %e, "[HEALTH] PostgreSQL ping failed");
            return Err(ApiError::new(
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                error_codes::SERVICE_UNAVAILABLE,
                "unavailable",
            ));
        }
    }

    Ok(Json(ApiResponse::success(HealthResponse {
        timestamp_ms: now_ms,
        version: env!("GIT_HASH"),
    })))
}
