use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Static greeting.
pub async fn root() -> impl IntoResponse {
    Json(json!({"message": "💬 Multi-Scripture Chat API"}))
}
