use axum::{extract::State, Json};
use serde::Deserialize;
use verse_chat::{validate_message, ChatReply};
use verse_core::AppResult;

use crate::error::ApiError;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    fn validate(&self) -> AppResult<()> {
        validate_message(&self.message)
    }
}

/// POST /chat
pub async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    request.validate()?;

    let reply = state.engine.handle(&request.message).await?;
    Ok(Json(reply))
}
