pub mod market;
pub mod metrics;
pub mod newsletter;
pub mod providers;

pub use market::{fetch_market_movers, fetch_stock_overview, MOVERS_LIMIT};
pub use metrics::{get_metrics, init_metrics, record_provider_call};
pub use newsletter::welcome_email;
pub use providers::{
    http_client, ChatProvider, EmailMessage, EmailProvider, FmpClient, HostedChatProvider,
    MarketMoversProvider, MockChatProvider, MockEmailProvider, MockMoversProvider,
    MockStockDataProvider, PolygonClient, ProviderError, ResendProvider, StockDataProvider,
};
