mod common;

use axum::http::StatusCode;
use common::{post_json, post_raw, TestState};
use serde_json::json;

#[tokio::test]
async fn cash_flow_two_month_projection() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/cash-flow",
        json!({
            "revenue": 25000,
            "expenses": 20000,
            "startingCash": 50000,
            "growthRate": 5,
            "months": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);

    assert_eq!(months[0]["month"], 1);
    assert_eq!(months[0]["netCashFlow"].as_f64(), Some(5000.0));
    assert_eq!(months[0]["cumulativeCash"].as_f64(), Some(55000.0));

    assert_eq!(months[1]["revenue"].as_f64(), Some(26250.0));
    assert_eq!(months[1]["netCashFlow"].as_f64(), Some(6250.0));
    assert_eq!(months[1]["cumulativeCash"].as_f64(), Some(61250.0));

    assert_eq!(body["summary"]["endingCash"].as_f64(), Some(61250.0));
}

#[tokio::test]
async fn cash_flow_accepts_form_strings_and_zeroes_garbage() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/cash-flow",
        json!({
            "revenue": "1,000",
            "expenses": "abc",
            "startingCash": null,
            "growthRate": "",
            "months": "3"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 3);
    assert_eq!(months[2]["expenses"].as_f64(), Some(0.0));
    assert_eq!(months[2]["cumulativeCash"].as_f64(), Some(3000.0));
}

#[tokio::test]
async fn out_of_range_number_is_zeroed() {
    let (status, body) = post_raw(
        TestState::new().router(),
        "/api/calculators/cash-flow",
        r#"{"revenue": 1e400, "expenses": 20000, "startingCash": 50000, "growthRate": 0, "months": 2}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["revenue"].as_f64(), Some(0.0));
    assert_eq!(months[0]["cumulativeCash"].as_f64(), Some(30000.0));
    assert_eq!(months[1]["cumulativeCash"].as_f64(), Some(10000.0));
}

#[tokio::test]
async fn calculator_without_body_is_bad_request() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/calculators/tax")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = common::send(TestState::new().router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn cash_flow_empty_body_gives_empty_projection() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/cash-flow",
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["months"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn investment_projection_by_year() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/investment",
        json!({
            "initialInvestment": 1000,
            "monthlyContribution": 0,
            "annualRate": 0,
            "years": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"].as_array().unwrap().len(), 3);
    assert_eq!(body["finalBalance"].as_f64(), Some(1000.0));
}

#[tokio::test]
async fn tax_with_equivalent_yield() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/tax",
        json!({
            "income": 50000,
            "deductions": 0,
            "brackets": [
                {"upTo": 10000, "rate": 10},
                {"upTo": null, "rate": 20}
            ],
            "taxFreeYield": 4
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 10% of 10k + 20% of 40k
    assert_eq!(body["totalTax"].as_f64(), Some(9000.0));
    assert_eq!(body["marginalRate"].as_f64(), Some(20.0));
    assert_eq!(body["taxEquivalentYield"].as_f64(), Some(5.0));
    assert_eq!(body["breakdown"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn tax_without_brackets_is_zero() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/calculators/tax",
        json!({"income": "50000", "deductions": "garbage"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["taxableIncome"].as_f64(), Some(50000.0));
    assert_eq!(body["totalTax"].as_f64(), Some(0.0));
    assert_eq!(body["afterTaxIncome"].as_f64(), Some(50000.0));
    assert!(body.get("taxEquivalentYield").is_none());
}
