use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::StockOverview;
use crate::services::fetch_stock_overview;
use crate::startup::AppState;

const MAX_SYMBOL_LEN: usize = 15;

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

/// Trim and upper-case a ticker; `None` when blank.
pub fn normalize_symbol(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
}

/// Tickers are letters, digits and the class/index punctuation `.`, `-`, `^`.
pub fn is_valid_symbol(symbol: &str) -> bool {
    symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^'))
}

#[tracing::instrument(skip(state))]
pub async fn get_stock(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<StockOverview>, AppError> {
    let Some(symbol) = normalize_symbol(query.symbol.as_deref()) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing required query parameter: symbol"
        )));
    };

    if !is_valid_symbol(&symbol) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid symbol: {}",
            symbol
        )));
    }

    let overview = fetch_stock_overview(state.stock_provider.as_ref(), &symbol)
        .await
        .map_err(|e| {
            AppError::UpstreamError(
                "Failed to fetch stock data".to_string(),
                anyhow::Error::new(e),
            )
        })?;

    match overview {
        Some(overview) => Ok(Json(overview)),
        None => Err(AppError::NotFound(anyhow::anyhow!(
            "No data found for symbol {}",
            symbol
        ))),
    }
}
