//! Closed-form financial calculators behind the `/api/calculators/*` routes.
//!
//! Inputs come straight from browser form fields, so every numeric field is
//! parsed leniently: numbers and numeric strings are accepted, anything else
//! (empty strings, `null`, text, NaN/inf) becomes zero.

pub mod cash_flow;
pub mod investment;
pub mod tax;

pub use cash_flow::{project_cash_flow, CashFlowInput, CashFlowProjection, ProjectionMonth};
pub use investment::{project_investment, InvestmentInput, InvestmentProjection, InvestmentYear};
pub use tax::{progressive_tax, tax_equivalent_yield, TaxBracket, TaxBreakdown, TaxResult};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a form value as `f64`, defaulting to `0.0` on anything malformed.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(number_or_zero).unwrap_or(0.0))
}

/// Like [`lenient_f64`] but keeps "absent" distinct from zero.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_number))
}

fn number_or_zero(value: &Value) -> f64 {
    parse_number(value).unwrap_or(0.0)
}

fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Truncate a lenient count (months, years) to a bounded whole number.
pub(crate) fn whole_periods(value: f64, max: u32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.trunc().min(max as f64) as u32
    }
}

/// Round to cents for presentation.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
