use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::extract::JsonBody;
use validator::Validate;

use crate::models::{ChatMessage, ChatRole};
use crate::services::record_provider_call;
use crate::startup::AppState;

/// Prior turns forwarded to the model.
pub const MAX_HISTORY_TURNS: usize = 20;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(max = 4000, message = "Message is too long"))]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// System prompt, then the most recent client turns, then the new message.
/// Client-supplied system turns are dropped.
pub fn build_conversation(
    system_prompt: &str,
    history: Vec<ChatMessage>,
    message: &str,
) -> Vec<ChatMessage> {
    let mut turns: Vec<ChatMessage> = history
        .into_iter()
        .filter(|m| m.role != ChatRole::System && !m.content.trim().is_empty())
        .collect();
    let skip = turns.len().saturating_sub(MAX_HISTORY_TURNS);
    turns.drain(..skip);

    let mut conversation = Vec::with_capacity(turns.len() + 2);
    conversation.push(ChatMessage::system(system_prompt));
    conversation.extend(turns);
    conversation.push(ChatMessage::user(message));
    conversation
}

#[tracing::instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Message is required")))?
        .to_string();

    request.validate()?;

    let conversation =
        build_conversation(&state.config.chat.system_prompt, request.history, &message);
    let provider = state.chat_provider.name();

    let reply = state
        .chat_provider
        .complete(&conversation)
        .await
        .map_err(|e| {
            record_provider_call(provider, "error");
            AppError::UpstreamError(
                "Failed to get chat response".to_string(),
                anyhow::Error::new(e),
            )
        })?;
    record_provider_call(provider, "success");

    if reply.trim().is_empty() {
        tracing::warn!(provider = %provider, "Chat provider returned an empty reply");
        return Err(AppError::BadGateway(
            "Empty response from chat provider".to_string(),
        ));
    }

    Ok(Json(ChatResponse { reply }))
}
