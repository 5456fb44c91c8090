use axum::{http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health() -> Response {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok",
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let mut body = ApiError::service_unavailable("Database unavailable").to_json();
            body["data"] = json!({ "status": "degraded", "timestamp": now });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response()
        }
    }
}
