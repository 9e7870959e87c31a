use super::{EmailMessage, EmailProvider, ProviderError};
use crate::config::ResendConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Transactional email through the Resend HTTP API.
pub struct ResendProvider {
    client: Client,
    config: ResendConfig,
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

impl ResendProvider {
    pub fn new(client: Client, config: ResendConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "RESEND_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, ProviderError> {
        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));
        let body = SendEmailBody {
            from: &self.config.from_email,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.body_html,
            text: &email.body_text,
        };

        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, error_text));
        }

        let parsed: SendEmailResponse = response.json().await?;

        tracing::info!(
            to = %email.to,
            provider_id = ?parsed.id,
            "Email sent via Resend"
        );

        Ok(parsed.id)
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

/// Mock email provider for development and tests.
pub struct MockEmailProvider {
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every send fails with a network error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("mock email failure".to_string()));
        }

        let count = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }

        tracing::info!(to = %email.to, "[MOCK] Email would be sent");

        Ok(Some(format!("mock-email-{}", count)))
    }

    fn name(&self) -> &'static str {
        "mock-email"
    }
}
