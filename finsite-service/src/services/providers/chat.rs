//! Chat relay to a hosted, OpenAI-compatible chat completions endpoint.

use super::{ChatProvider, ProviderError};
use crate::config::ChatConfig;
use crate::models::{ChatMessage, ChatRole};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;

pub struct HostedChatProvider {
    client: Client,
    config: ChatConfig,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl HostedChatProvider {
    pub fn new(client: Client, config: ChatConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "CHAT_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatProvider for HostedChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            turns = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .traced_post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, error_text));
        }

        let completion: CompletionResponse = response.json().await?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}

/// Mock chat provider: echoes the last user turn unless a fixed reply is set.
pub struct MockChatProvider {
    enabled: bool,
    reply: Option<String>,
}

impl MockChatProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reply: None,
        }
    }

    /// Always answer with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            enabled: true,
            reply: Some(reply.into()),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        tracing::info!(turns = messages.len(), "[MOCK] Chat completion");

        Ok(format!("Mock response for: {}", last_user))
    }

    fn name(&self) -> &'static str {
        "mock-chat"
    }
}
