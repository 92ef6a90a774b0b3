//! Health API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health - 健康检查 (含数据库连通性)
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| AppError::database(format!("Health check query failed: {e}")))?;

    Ok(Json(HealthResponse { status: "healthy" }))
}
