use serde::{Deserialize, Serialize};

/// Latest quote for a ticker, as returned to the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub year_low: Option<f64>,
    pub year_high: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
    pub pe: Option<f64>,
    pub eps: Option<f64>,
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
}

/// One daily close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub close: f64,
    pub volume: Option<f64>,
}

/// The fixed envelope served by `GET /api/stock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOverview {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub year_low: Option<f64>,
    pub year_high: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
    pub pe: Option<f64>,
    pub eps: Option<f64>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
    /// Oldest first.
    pub history: Vec<PricePoint>,
}

impl StockOverview {
    /// Merge a quote with an optional profile and history. The profile's
    /// company name wins over the quote's short name.
    pub fn assemble(quote: Quote, profile: Option<CompanyProfile>, mut history: Vec<PricePoint>) -> Self {
        let profile = profile.unwrap_or_default();
        history.sort_by(|a, b| a.date.cmp(&b.date));

        Self {
            symbol: quote.symbol,
            name: profile.company_name.or(quote.name),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            day_low: quote.day_low,
            day_high: quote.day_high,
            year_low: quote.year_low,
            year_high: quote.year_high,
            market_cap: quote.market_cap,
            volume: quote.volume,
            avg_volume: quote.avg_volume,
            pe: quote.pe,
            eps: quote.eps,
            exchange: quote.exchange,
            sector: profile.sector,
            industry: profile.industry,
            description: profile.description,
            website: profile.website,
            image: profile.image,
            history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub ticker: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketMovers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}
