//! Mock market-data providers for development and tests.

use super::{MarketMoversProvider, ProviderError, StockDataProvider};
use crate::models::{CompanyProfile, Mover, PricePoint, Quote};
use async_trait::async_trait;

/// Serves a single fixed ticker; every other symbol has no data.
pub struct MockStockDataProvider {
    fail: bool,
}

impl MockStockDataProvider {
    pub const SYMBOL: &'static str = "DEMO";

    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A provider whose every call fails with a network error.
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.fail {
            Err(ProviderError::Network("mock market data failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockStockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StockDataProvider for MockStockDataProvider {
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        self.check()?;
        if symbol != Self::SYMBOL {
            return Ok(None);
        }
        Ok(Some(Quote {
            symbol: Self::SYMBOL.to_string(),
            name: Some("Demo Corp".to_string()),
            price: 100.0,
            change: Some(2.0),
            change_percent: Some(2.04),
            day_low: Some(97.5),
            day_high: Some(101.0),
            year_low: Some(80.0),
            year_high: Some(120.0),
            market_cap: Some(1.0e9),
            volume: Some(1_000_000.0),
            avg_volume: Some(900_000.0),
            pe: Some(18.2),
            eps: Some(5.49),
            exchange: Some("MOCK".to_string()),
        }))
    }

    async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ProviderError> {
        self.check()?;
        if symbol != Self::SYMBOL {
            return Ok(None);
        }
        Ok(Some(CompanyProfile {
            company_name: Some("Demo Corporation".to_string()),
            sector: Some("Technology".to_string()),
            industry: Some("Software".to_string()),
            description: Some("Sample company served without a market-data key.".to_string()),
            website: None,
            image: None,
        }))
    }

    async fn history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError> {
        self.check()?;
        if symbol != Self::SYMBOL {
            return Ok(Vec::new());
        }
        // Newest first, like the real feed.
        Ok((1..=5)
            .rev()
            .map(|day| PricePoint {
                date: format!("2024-01-{:02}", day),
                close: 95.0 + day as f64,
                volume: Some(1_000_000.0),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "mock-stock"
    }
}

/// Returns `count` synthetic movers in each direction.
pub struct MockMoversProvider {
    count: usize,
    fail: bool,
}

impl MockMoversProvider {
    pub fn new(count: usize) -> Self {
        Self { count, fail: false }
    }

    pub fn failing() -> Self {
        Self { count: 0, fail: true }
    }

    fn movers(&self, sign: f64, prefix: &str) -> Result<Vec<Mover>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("mock movers failure".to_string()));
        }
        Ok((0..self.count)
            .map(|i| Mover {
                ticker: format!("{}{}", prefix, i),
                price: 10.0 + i as f64,
                change: sign * (self.count - i) as f64,
                change_percent: sign * (self.count - i) as f64 * 2.5,
                volume: Some(10_000.0),
            })
            .collect())
    }
}

#[async_trait]
impl MarketMoversProvider for MockMoversProvider {
    async fn gainers(&self) -> Result<Vec<Mover>, ProviderError> {
        self.movers(1.0, "GAIN")
    }

    async fn losers(&self) -> Result<Vec<Mover>, ProviderError> {
        self.movers(-1.0, "LOSE")
    }

    fn name(&self) -> &'static str {
        "mock-movers"
    }
}
