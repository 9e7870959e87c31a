use super::{lenient_f64, round2, whole_periods};
use serde::{Deserialize, Serialize};

/// Longest projection the calculator will produce (50 years).
pub const MAX_PROJECTION_MONTHS: u32 = 600;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowInput {
    /// Revenue in the first projected month.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue: f64,
    /// Flat monthly expenses.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expenses: f64,
    #[serde(default, deserialize_with = "lenient_f64", alias = "starting_cash")]
    pub starting_cash: f64,
    /// Monthly revenue growth in percent.
    #[serde(default, deserialize_with = "lenient_f64", alias = "growth_rate")]
    pub growth_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64", alias = "period")]
    pub months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMonth {
    pub month: u32,
    pub revenue: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_net_cash_flow: f64,
    pub ending_cash: f64,
    /// First month whose cumulative cash is negative.
    pub cash_out_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub months: Vec<ProjectionMonth>,
    pub summary: CashFlowSummary,
}

/// Project monthly cash flow.
///
/// Month 1 uses `revenue` as entered; each later month compounds the previous
/// month's revenue by `growth_rate`. Expenses stay flat. Values are carried at
/// full precision and rounded to cents only on output.
pub fn project_cash_flow(input: &CashFlowInput) -> CashFlowProjection {
    let months = whole_periods(input.months, MAX_PROJECTION_MONTHS);
    let growth = 1.0 + input.growth_rate / 100.0;

    let mut revenue = input.revenue;
    let mut cash = input.starting_cash;
    let mut total_revenue = 0.0;
    let mut total_expenses = 0.0;
    let mut cash_out_month = None;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        if month > 1 {
            revenue *= growth;
        }
        let net = revenue - input.expenses;
        cash += net;
        total_revenue += revenue;
        total_expenses += input.expenses;

        if cash < 0.0 && cash_out_month.is_none() {
            cash_out_month = Some(month);
        }

        rows.push(ProjectionMonth {
            month,
            revenue: round2(revenue),
            expenses: round2(input.expenses),
            net_cash_flow: round2(net),
            cumulative_cash: round2(cash),
        });
    }

    CashFlowProjection {
        months: rows,
        summary: CashFlowSummary {
            total_revenue: round2(total_revenue),
            total_expenses: round2(total_expenses),
            total_net_cash_flow: round2(total_revenue - total_expenses),
            ending_cash: round2(cash),
            cash_out_month,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(revenue: f64, expenses: f64, starting_cash: f64, growth: f64, months: f64) -> CashFlowInput {
        CashFlowInput {
            revenue,
            expenses,
            starting_cash,
            growth_rate: growth,
            months,
        }
    }

    #[test]
    fn two_month_example() {
        let projection = project_cash_flow(&input(25000.0, 20000.0, 50000.0, 5.0, 2.0));

        assert_eq!(projection.months.len(), 2);
        let m1 = &projection.months[0];
        assert_eq!(m1.revenue, 25000.0);
        assert_eq!(m1.net_cash_flow, 5000.0);
        assert_eq!(m1.cumulative_cash, 55000.0);

        let m2 = &projection.months[1];
        assert_eq!(m2.revenue, 26250.0);
        assert_eq!(m2.net_cash_flow, 6250.0);
        assert_eq!(m2.cumulative_cash, 61250.0);

        assert_eq!(projection.summary.ending_cash, 61250.0);
        assert_eq!(projection.summary.total_net_cash_flow, 11250.0);
        assert_eq!(projection.summary.cash_out_month, None);
    }

    #[test]
    fn cumulative_cash_matches_closed_form_sum() {
        let inp = input(12000.0, 9000.0, 1000.0, 3.5, 36.0);
        let projection = project_cash_flow(&inp);

        let mut expected = inp.starting_cash;
        for (i, row) in projection.months.iter().enumerate() {
            let revenue = inp.revenue * (1.0 + inp.growth_rate / 100.0).powi(i as i32);
            expected += revenue - inp.expenses;
            assert!(
                (row.cumulative_cash - expected).abs() < 0.01,
                "month {}: {} vs {}",
                row.month,
                row.cumulative_cash,
                expected
            );
        }
    }

    #[test]
    fn zero_growth_is_linear() {
        let projection = project_cash_flow(&input(1000.0, 400.0, 0.0, 0.0, 12.0));
        assert!(projection.months.iter().all(|m| m.revenue == 1000.0));
        assert_eq!(projection.summary.ending_cash, 7200.0);
    }

    #[test]
    fn reports_first_negative_month() {
        let projection = project_cash_flow(&input(1000.0, 3000.0, 5000.0, 0.0, 6.0));
        // 5000 -> 3000 -> 1000 -> -1000
        assert_eq!(projection.summary.cash_out_month, Some(3));
    }

    #[test]
    fn zero_or_negative_months_yield_empty_projection() {
        assert!(project_cash_flow(&input(1.0, 1.0, 1.0, 1.0, 0.0)).months.is_empty());
        let projection = project_cash_flow(&input(1.0, 1.0, 42.0, 1.0, -5.0));
        assert!(projection.months.is_empty());
        assert_eq!(projection.summary.ending_cash, 42.0);
    }

    #[test]
    fn months_are_capped() {
        let projection = project_cash_flow(&input(1.0, 0.0, 0.0, 0.0, 1e9));
        assert_eq!(projection.months.len(), MAX_PROJECTION_MONTHS as usize);
    }

    #[test]
    fn malformed_json_fields_default_to_zero() {
        let inp: CashFlowInput = serde_json::from_str(
            r#"{"revenue": "", "expenses": "abc", "startingCash": "50000", "growthRate": null, "months": "2"}"#,
        )
        .unwrap();
        assert_eq!(inp.revenue, 0.0);
        assert_eq!(inp.expenses, 0.0);
        assert_eq!(inp.starting_cash, 50000.0);
        assert_eq!(inp.growth_rate, 0.0);

        let projection = project_cash_flow(&inp);
        assert_eq!(projection.months.len(), 2);
        assert_eq!(projection.summary.ending_cash, 50000.0);
    }
}
