//! Polygon.io snapshot client for the day's top gainers and losers.

use super::{MarketMoversProvider, ProviderError};
use crate::config::PolygonConfig;
use crate::models::Mover;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::observability::TracedClientExt;

pub struct PolygonClient {
    client: Client,
    config: PolygonConfig,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    #[serde(default)]
    tickers: Vec<TickerSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerSnapshot {
    ticker: String,
    #[serde(default)]
    todays_change: f64,
    #[serde(default)]
    todays_change_perc: f64,
    day: Option<Bar>,
    min: Option<Bar>,
    prev_day: Option<Bar>,
    last_trade: Option<Trade>,
}

#[derive(Debug, Deserialize)]
struct Bar {
    c: Option<f64>,
    v: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Trade {
    p: Option<f64>,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

impl TickerSnapshot {
    /// Before the open the day bar is all zeros, so fall back through the last
    /// trade, the latest minute bar and the previous close.
    fn into_mover(self) -> Mover {
        let price = positive(self.day.as_ref().and_then(|d| d.c))
            .or_else(|| positive(self.last_trade.as_ref().and_then(|t| t.p)))
            .or_else(|| positive(self.min.as_ref().and_then(|m| m.c)))
            .or_else(|| positive(self.prev_day.as_ref().and_then(|p| p.c)))
            .unwrap_or(0.0);
        let volume = positive(self.day.as_ref().and_then(|d| d.v))
            .or_else(|| positive(self.prev_day.as_ref().and_then(|p| p.v)));

        Mover {
            ticker: self.ticker,
            price,
            change: self.todays_change,
            change_percent: self.todays_change_perc,
            volume,
        }
    }
}

impl PolygonClient {
    pub fn new(client: Client, config: PolygonConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "POLYGON_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self { client, config })
    }

    async fn snapshot(&self, direction: &str) -> Result<Vec<Mover>, ProviderError> {
        let url = format!(
            "{}/v2/snapshot/locale/us/markets/stocks/{}",
            self.config.base_url.trim_end_matches('/'),
            direction
        );

        let response = self
            .client
            .traced_get(&url)
            .query(&[("apiKey", self.config.api_key.expose_secret().as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, error_text));
        }

        let snapshot: SnapshotResponse = response.json().await?;

        tracing::debug!(
            direction = %direction,
            count = snapshot.tickers.len(),
            "Polygon snapshot received"
        );

        Ok(snapshot
            .tickers
            .into_iter()
            .map(TickerSnapshot::into_mover)
            .collect())
    }
}

#[async_trait]
impl MarketMoversProvider for PolygonClient {
    async fn gainers(&self) -> Result<Vec<Mover>, ProviderError> {
        self.snapshot("gainers").await
    }

    async fn losers(&self) -> Result<Vec<Mover>, ProviderError> {
        self.snapshot("losers").await
    }

    fn name(&self) -> &'static str {
        "polygon"
    }
}
