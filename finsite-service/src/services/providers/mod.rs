//! Upstream provider abstractions and implementations.
//!
//! Each external dependency sits behind a trait so the router can be driven by
//! mocks in development (no API keys) and in tests.

pub mod chat;
pub mod email;
pub mod fmp;
pub mod mock;
pub mod polygon;

use crate::models::{ChatMessage, CompanyProfile, Mover, PricePoint, Quote};
use async_trait::async_trait;
use thiserror::Error;

pub use chat::{HostedChatProvider, MockChatProvider};
pub use email::{MockEmailProvider, ResendProvider};
pub use fmp::FmpClient;
pub use mock::{MockMoversProvider, MockStockDataProvider};
pub use polygon::PolygonClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Classify a non-success upstream status.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ProviderError::RateLimited
        } else {
            ProviderError::Api {
                status: status.as_u16(),
                message: body,
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Build the shared reqwest client used by every provider.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send one message; returns the provider's message id when it reports one.
    async fn send(&self, email: &EmailMessage) -> Result<Option<String>, ProviderError>;
    fn name(&self) -> &'static str;
}

/// Quote, profile and history for a single ticker.
#[async_trait]
pub trait StockDataProvider: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError>;
    async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ProviderError>;
    async fn history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError>;
    fn name(&self) -> &'static str;
}

/// Day's top gainers and losers across the market.
#[async_trait]
pub trait MarketMoversProvider: Send + Sync {
    async fn gainers(&self) -> Result<Vec<Mover>, ProviderError>;
    async fn losers(&self) -> Result<Vec<Mover>, ProviderError>;
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete a conversation; `messages` already includes the system prompt.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
    fn name(&self) -> &'static str;
}
