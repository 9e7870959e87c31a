#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use finsite_service::config::{
    ChatConfig, FinsiteConfig, FmpConfig, PolygonConfig, ResendConfig, SecurityConfig,
};
use finsite_service::services::{
    ChatProvider, EmailProvider, MarketMoversProvider, MockChatProvider, MockEmailProvider,
    MockMoversProvider, MockStockDataProvider, StockDataProvider,
};
use finsite_service::startup::Application;
use finsite_service::{build_router, AppState};
use secrecy::Secret;
use service_core::middleware::rate_limit::{create_ip_rate_limiter, IpRateLimit};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SYSTEM_PROMPT: &str = "You are a test assistant.";

/// Config with every provider key empty; base URLs point at `base_url`.
pub fn test_config(base_url: &str) -> FinsiteConfig {
    FinsiteConfig {
        common: service_core::config::Config {
            port: 0,
            log_level: "error".to_string(),
        },
        resend: ResendConfig {
            api_key: Secret::new(String::new()),
            base_url: base_url.to_string(),
            from_email: "Finsite <test@example.com>".to_string(),
            subject: "Welcome aboard".to_string(),
        },
        fmp: FmpConfig {
            api_key: Secret::new(String::new()),
            base_url: base_url.to_string(),
            history_days: 30,
        },
        polygon: PolygonConfig {
            api_key: Secret::new(String::new()),
            base_url: base_url.to_string(),
        },
        chat: ChatConfig {
            api_key: Secret::new(String::new()),
            endpoint: format!("{}/v1/chat/completions", base_url),
            model: "test-model".to_string(),
            system_prompt: TEST_SYSTEM_PROMPT.to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            rate_limit_per_minute: 100,
            trusted_proxy_hops: 1,
        },
        upstream_timeout_secs: 5,
        otlp_endpoint: None,
    }
}

/// Builder for router state backed by mock providers.
pub struct TestState {
    pub config: FinsiteConfig,
    pub email: Arc<dyn EmailProvider>,
    pub stock: Arc<dyn StockDataProvider>,
    pub movers: Arc<dyn MarketMoversProvider>,
    pub chat: Arc<dyn ChatProvider>,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            config: test_config("http://127.0.0.1:9"),
            email: Arc::new(MockEmailProvider::new()),
            stock: Arc::new(MockStockDataProvider::new()),
            movers: Arc::new(MockMoversProvider::new(8)),
            chat: Arc::new(MockChatProvider::new(true)),
        }
    }

    pub fn email(mut self, provider: Arc<dyn EmailProvider>) -> Self {
        self.email = provider;
        self
    }

    pub fn stock(mut self, provider: Arc<dyn StockDataProvider>) -> Self {
        self.stock = provider;
        self
    }

    pub fn movers(mut self, provider: Arc<dyn MarketMoversProvider>) -> Self {
        self.movers = provider;
        self
    }

    pub fn chat(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.chat = provider;
        self
    }

    pub fn rate_limit(mut self, per_minute: u32) -> Self {
        self.config.security.rate_limit_per_minute = per_minute;
        self
    }

    pub fn trusted_proxy_hops(mut self, hops: usize) -> Self {
        self.config.security.trusted_proxy_hops = hops;
        self
    }

    pub fn router(self) -> Router {
        let rate_limiter = IpRateLimit::new(
            create_ip_rate_limiter(self.config.security.rate_limit_per_minute, 60),
            self.config.security.trusted_proxy_hops,
        );
        build_router(AppState {
            config: self.config,
            email_provider: self.email,
            stock_provider: self.stock,
            movers_provider: self.movers,
            chat_provider: self.chat,
            rate_limiter,
        })
    }
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a body verbatim, for payloads `serde_json::Value` cannot represent.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// A running server on a random port, wired from config like production.
pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(config: FinsiteConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
