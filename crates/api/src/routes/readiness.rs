use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::ApiState;

/// Readiness probe: 200 with the loaded corpora, 503 when none loaded.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    let corpora = state.engine.corpora().summaries();

    if corpora.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "corpora": corpora,
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "corpora": corpora,
            })),
        )
    }
}
