//! FinancialModelingPrep client for per-ticker quote, profile and history.

use super::{ProviderError, StockDataProvider};
use crate::config::FmpConfig;
use crate::models::{CompanyProfile, PricePoint, Quote};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use service_core::observability::TracedClientExt;

pub struct FmpClient {
    client: Client,
    config: FmpConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: String,
    name: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    changes_percentage: Option<f64>,
    day_low: Option<f64>,
    day_high: Option<f64>,
    year_low: Option<f64>,
    year_high: Option<f64>,
    market_cap: Option<f64>,
    volume: Option<f64>,
    avg_volume: Option<f64>,
    pe: Option<f64>,
    eps: Option<f64>,
    exchange: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpProfile {
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    description: Option<String>,
    website: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FmpHistory {
    #[serde(default)]
    historical: Vec<FmpHistoricalPrice>,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalPrice {
    date: String,
    close: f64,
    volume: Option<f64>,
}

impl FmpQuote {
    /// A quote without a price is not usable.
    fn into_quote(self) -> Option<Quote> {
        Some(Quote {
            price: self.price?,
            symbol: self.symbol,
            name: self.name,
            change: self.change,
            change_percent: self.changes_percentage,
            day_low: self.day_low,
            day_high: self.day_high,
            year_low: self.year_low,
            year_high: self.year_high,
            market_cap: self.market_cap,
            volume: self.volume,
            avg_volume: self.avg_volume,
            pe: self.pe,
            eps: self.eps,
            exchange: self.exchange,
        })
    }
}

impl FmpClient {
    pub fn new(client: Client, config: FmpConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "FMP_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self { client, config })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        tracing::debug!(path = %path, "Calling FinancialModelingPrep");

        let response = self
            .client
            .traced_get(&url)
            .query(extra)
            .query(&[("apikey", self.config.api_key.expose_secret().as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, error_text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl StockDataProvider for FmpClient {
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        let quotes: Vec<FmpQuote> = self.get(&format!("quote/{}", symbol), &[]).await?;
        Ok(quotes.into_iter().next().and_then(FmpQuote::into_quote))
    }

    async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ProviderError> {
        let profiles: Vec<FmpProfile> = self.get(&format!("profile/{}", symbol), &[]).await?;
        Ok(profiles.into_iter().next().map(|p| CompanyProfile {
            company_name: p.company_name,
            sector: p.sector,
            industry: p.industry,
            description: p.description,
            website: p.website,
            image: p.image,
        }))
    }

    async fn history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError> {
        // Unknown symbols come back as `{}`.
        let history: FmpHistory = self
            .get(
                &format!("historical-price-full/{}", symbol),
                &[("timeseries", self.config.history_days.to_string())],
            )
            .await?;

        Ok(history
            .historical
            .into_iter()
            .map(|p| PricePoint {
                date: p.date,
                close: p.close,
                volume: p.volume,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "fmp"
    }
}
