mod common;

use axum::http::StatusCode;
use common::{get_json, TestState};
use finsite_service::services::MockMoversProvider;
use std::sync::Arc;

#[tokio::test]
async fn movers_are_truncated_to_five() {
    let app = TestState::new()
        .movers(Arc::new(MockMoversProvider::new(12)))
        .router();

    let (status, body) = get_json(app, "/api/market/movers").await;

    assert_eq!(status, StatusCode::OK);
    let gainers = body["gainers"].as_array().unwrap();
    let losers = body["losers"].as_array().unwrap();
    assert_eq!(gainers.len(), 5);
    assert_eq!(losers.len(), 5);
    assert_eq!(gainers[0]["ticker"], "GAIN0");
    assert!(losers[0]["changePercent"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn empty_market_gives_empty_lists() {
    let app = TestState::new()
        .movers(Arc::new(MockMoversProvider::new(0)))
        .router();

    let (status, body) = get_json(app, "/api/market/movers").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["gainers"].as_array().unwrap().is_empty());
    assert!(body["losers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_generic_500() {
    let app = TestState::new()
        .movers(Arc::new(MockMoversProvider::failing()))
        .router();

    let (status, body) = get_json(app, "/api/market/movers").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch market movers");
}
