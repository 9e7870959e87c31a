//! Application startup and lifecycle management.

use crate::config::FinsiteConfig;
use crate::handlers;
use crate::services::{
    http_client, ChatProvider, EmailProvider, FmpClient, HostedChatProvider,
    MarketMoversProvider, MockChatProvider, MockEmailProvider, MockMoversProvider,
    MockStockDataProvider, PolygonClient, ResendProvider, StockDataProvider,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{
        create_ip_rate_limiter, ip_rate_limit_middleware, spawn_rate_limiter_cleanup, IpRateLimit,
    },
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, request_span, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: FinsiteConfig,
    pub email_provider: Arc<dyn EmailProvider>,
    pub stock_provider: Arc<dyn StockDataProvider>,
    pub movers_provider: Arc<dyn MarketMoversProvider>,
    pub chat_provider: Arc<dyn ChatProvider>,
    pub rate_limiter: IpRateLimit,
}

impl AppState {
    /// Real providers for every configured key, mocks for the rest.
    pub fn from_config(config: FinsiteConfig) -> Result<Self, AppError> {
        let client = http_client(config.upstream_timeout_secs)
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        let email_provider: Arc<dyn EmailProvider> =
            match ResendProvider::new(client.clone(), config.resend.clone()) {
                Ok(provider) => {
                    tracing::info!("Resend email provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("{}. Using mock email provider.", e);
                    Arc::new(MockEmailProvider::new())
                }
            };

        let stock_provider: Arc<dyn StockDataProvider> =
            match FmpClient::new(client.clone(), config.fmp.clone()) {
                Ok(provider) => {
                    tracing::info!("FMP stock data provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("{}. Using mock stock data provider.", e);
                    Arc::new(MockStockDataProvider::new())
                }
            };

        let movers_provider: Arc<dyn MarketMoversProvider> =
            match PolygonClient::new(client.clone(), config.polygon.clone()) {
                Ok(provider) => {
                    tracing::info!("Polygon market movers provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("{}. Using mock market movers provider.", e);
                    Arc::new(MockMoversProvider::new(10))
                }
            };

        let chat_provider: Arc<dyn ChatProvider> =
            match HostedChatProvider::new(client, config.chat.clone()) {
                Ok(provider) => {
                    tracing::info!(model = %config.chat.model, "Hosted chat provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("{}. Using mock chat provider.", e);
                    Arc::new(MockChatProvider::new(true))
                }
            };

        let rate_limiter = IpRateLimit::new(
            create_ip_rate_limiter(config.security.rate_limit_per_minute, 60),
            config.security.trusted_proxy_hops,
        );

        Ok(Self {
            config,
            email_provider,
            stock_provider,
            movers_provider,
            chat_provider,
            rate_limiter,
        })
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    // Routes that spend money upstream on every call.
    let limited_routes = Router::new()
        .route("/api/subscribe", post(handlers::subscribe::subscribe))
        .route("/api/chat", post(handlers::chat::chat))
        .route_layer(from_fn_with_state(
            state.rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/api/calculators/cash-flow",
            post(handlers::calculators::cash_flow),
        )
        .route(
            "/api/calculators/investment",
            post(handlers::calculators::investment),
        )
        .route("/api/calculators/tax", post(handlers::calculators::tax))
        .route("/api/stock", get(handlers::stocks::get_stock))
        .route("/api/market/movers", get(handlers::market::get_movers))
        .merge(limited_routes)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
        .with_state(state)
}

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener and wire providers. Port 0 picks a random port.
    pub async fn build(config: FinsiteConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::from_config(config)?;
        spawn_rate_limiter_cleanup(state.rate_limiter.limiter.clone(), RATE_LIMIT_CLEANUP_INTERVAL);
        let router = build_router(state);

        tracing::info!(port = port, "finsite-service listening");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
