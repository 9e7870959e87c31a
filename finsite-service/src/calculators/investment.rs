use super::{lenient_f64, round2, whole_periods};
use serde::{Deserialize, Serialize};

pub const MAX_INVESTMENT_YEARS: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInput {
    #[serde(default, deserialize_with = "lenient_f64", alias = "principal")]
    pub initial_investment: f64,
    #[serde(default, deserialize_with = "lenient_f64", alias = "monthly_contribution")]
    pub monthly_contribution: f64,
    /// Expected annual return in percent.
    #[serde(default, deserialize_with = "lenient_f64", alias = "annual_rate")]
    pub annual_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentYear {
    pub year: u32,
    pub total_contributions: f64,
    pub total_interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProjection {
    pub years: Vec<InvestmentYear>,
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

/// Grow an investment with monthly compounding and end-of-month contributions.
pub fn project_investment(input: &InvestmentInput) -> InvestmentProjection {
    let years = whole_periods(input.years, MAX_INVESTMENT_YEARS);
    let monthly_rate = input.annual_rate / 12.0 / 100.0;

    let mut balance = input.initial_investment;
    let mut contributed = input.initial_investment;
    let mut rows = Vec::with_capacity(years as usize);

    for year in 1..=years {
        for _ in 0..12 {
            balance += balance * monthly_rate;
            balance += input.monthly_contribution;
            contributed += input.monthly_contribution;
        }
        rows.push(InvestmentYear {
            year,
            total_contributions: round2(contributed),
            total_interest: round2(balance - contributed),
            balance: round2(balance),
        });
    }

    InvestmentProjection {
        years: rows,
        final_balance: round2(balance),
        total_contributions: round2(contributed),
        total_interest: round2(balance - contributed),
    }
}
