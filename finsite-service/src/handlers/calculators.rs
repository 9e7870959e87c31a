use axum::Json;
use serde::{Deserialize, Serialize};
use service_core::extract::JsonBody;

use crate::calculators::{
    lenient_f64, lenient_opt_f64, progressive_tax, project_cash_flow, project_investment,
    tax_equivalent_yield, CashFlowInput, CashFlowProjection, InvestmentInput,
    InvestmentProjection, TaxBracket, TaxResult,
};

#[tracing::instrument(skip_all)]
pub async fn cash_flow(JsonBody(input): JsonBody<CashFlowInput>) -> Json<CashFlowProjection> {
    Json(project_cash_flow(&input))
}

#[tracing::instrument(skip_all)]
pub async fn investment(
    JsonBody(input): JsonBody<InvestmentInput>,
) -> Json<InvestmentProjection> {
    Json(project_investment(&input))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub income: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub deductions: f64,
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
    /// Tax-free yield in percent to convert at the resulting marginal rate.
    #[serde(default, deserialize_with = "lenient_opt_f64", alias = "tax_free_yield")]
    pub tax_free_yield: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponse {
    #[serde(flatten)]
    pub result: TaxResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_equivalent_yield: Option<f64>,
}

#[tracing::instrument(skip_all)]
pub async fn tax(JsonBody(request): JsonBody<TaxRequest>) -> Json<TaxResponse> {
    let result = progressive_tax(request.income, request.deductions, &request.brackets);
    let tax_equivalent_yield = request
        .tax_free_yield
        .map(|y| tax_equivalent_yield(y, result.marginal_rate));

    Json(TaxResponse {
        result,
        tax_equivalent_yield,
    })
}
