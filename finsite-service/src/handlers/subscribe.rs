use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::extract::JsonBody;
use validator::Validate;

use crate::services::{record_provider_call, welcome_email};
use crate::startup::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub id: Option<String>,
}

#[tracing::instrument(skip(state, request))]
pub async fn subscribe(
    State(state): State<AppState>,
    JsonBody(mut request): JsonBody<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    request.email = request
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let Some(email) = request.email.as_deref() else {
        return Err(AppError::BadRequest(anyhow::anyhow!("Email is required")));
    };

    request.validate()?;

    let message = welcome_email(email, &state.config.resend.subject);
    let provider = state.email_provider.name();

    match state.email_provider.send(&message).await {
        Ok(id) => {
            record_provider_call(provider, "success");
            tracing::info!(provider = %provider, provider_id = ?id, "Subscriber welcomed");
            Ok(Json(SubscribeResponse { success: true, id }))
        }
        Err(e) => {
            record_provider_call(provider, "error");
            Err(AppError::UpstreamError(
                "Failed to subscribe".to_string(),
                anyhow::Error::new(e),
            ))
        }
    }
}
