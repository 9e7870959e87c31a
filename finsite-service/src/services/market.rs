//! Market data fan-out: one browser request becomes several concurrent
//! provider calls, joined before the response is shaped.

use super::metrics::{call_status, record_provider_call};
use super::providers::{MarketMoversProvider, ProviderError, StockDataProvider};
use crate::models::{MarketMovers, StockOverview};

/// Entries kept per direction in the movers response.
pub const MOVERS_LIMIT: usize = 5;

/// Fetch quote, profile and history concurrently and merge them.
///
/// Returns `Ok(None)` when the provider has no quote for `symbol`. Any failed
/// call fails the whole request.
pub async fn fetch_stock_overview(
    provider: &dyn StockDataProvider,
    symbol: &str,
) -> Result<Option<StockOverview>, ProviderError> {
    let result = tokio::try_join!(
        provider.quote(symbol),
        provider.profile(symbol),
        provider.history(symbol),
    );
    record_provider_call(provider.name(), call_status(&result));

    let (quote, profile, history) = result?;
    Ok(quote.map(|quote| StockOverview::assemble(quote, profile, history)))
}

/// Fetch gainers and losers concurrently, keeping the first `MOVERS_LIMIT` of each.
pub async fn fetch_market_movers(
    provider: &dyn MarketMoversProvider,
) -> Result<MarketMovers, ProviderError> {
    let result = tokio::try_join!(provider.gainers(), provider.losers());
    record_provider_call(provider.name(), call_status(&result));

    let (mut gainers, mut losers) = result?;
    gainers.truncate(MOVERS_LIMIT);
    losers.truncate(MOVERS_LIMIT);

    Ok(MarketMovers { gainers, losers })
}
