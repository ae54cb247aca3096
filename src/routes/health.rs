use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use crate::db;
use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Response {
    match db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": Utc::now().to_rfc3339(),
                "uptime": state.started_at.elapsed().as_secs_f64(),
                "dbStatus": "connected",
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Healthcheck failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Database is not connected",
                })),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Not Found" })),
    )
        .into_response()
}
