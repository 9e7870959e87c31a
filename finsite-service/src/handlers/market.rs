use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::models::MarketMovers;
use crate::services::fetch_market_movers;
use crate::startup::AppState;

#[tracing::instrument(skip(state))]
pub async fn get_movers(State(state): State<AppState>) -> Result<Json<MarketMovers>, AppError> {
    let movers = fetch_market_movers(state.movers_provider.as_ref())
        .await
        .map_err(|e| {
            AppError::UpstreamError(
                "Failed to fetch market movers".to_string(),
                anyhow::Error::new(e),
            )
        })?;

    Ok(Json(movers))
}
