use super::{lenient_f64, lenient_opt_f64, round2};
use serde::{Deserialize, Serialize};

/// One band of a progressive schedule. `up_to` is the inclusive upper bound of
/// taxable income for this band; `None` marks the open top band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    #[serde(default, deserialize_with = "lenient_opt_f64", alias = "up_to")]
    pub up_to: Option<f64>,
    /// Rate in percent.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub rate: f64,
    pub taxed_amount: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub taxable_income: f64,
    pub total_tax: f64,
    /// Total tax over gross income, in percent.
    pub effective_rate: f64,
    /// Rate of the highest band that taxed any income.
    pub marginal_rate: f64,
    pub after_tax_income: f64,
    pub breakdown: Vec<TaxBreakdown>,
}

/// Apply a progressive bracket schedule to `income - deductions`.
///
/// Brackets are sorted by upper bound before use; bands past the first open
/// band are ignored.
pub fn progressive_tax(income: f64, deductions: f64, brackets: &[TaxBracket]) -> TaxResult {
    let income = income.max(0.0);
    let taxable = (income - deductions.max(0.0)).max(0.0);

    let mut ordered: Vec<&TaxBracket> = brackets.iter().collect();
    ordered.sort_by(|a, b| match (a.up_to, b.up_to) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut lower = 0.0;
    let mut total_tax = 0.0;
    let mut marginal_rate = 0.0;
    let mut breakdown = Vec::new();

    for bracket in ordered {
        if taxable <= lower {
            break;
        }
        let upper = bracket.up_to.unwrap_or(f64::INFINITY);
        if upper <= lower {
            continue;
        }
        let taxed_amount = taxable.min(upper) - lower;
        let tax = taxed_amount * bracket.rate / 100.0;

        total_tax += tax;
        marginal_rate = bracket.rate;
        breakdown.push(TaxBreakdown {
            rate: bracket.rate,
            taxed_amount: round2(taxed_amount),
            tax: round2(tax),
        });

        if bracket.up_to.is_none() {
            break;
        }
        lower = upper;
    }

    let effective_rate = if income > 0.0 {
        total_tax / income * 100.0
    } else {
        0.0
    };

    TaxResult {
        taxable_income: round2(taxable),
        total_tax: round2(total_tax),
        effective_rate: round2(effective_rate),
        marginal_rate,
        after_tax_income: round2(income - total_tax),
        breakdown,
    }
}

/// Taxable yield needed to match a tax-free yield at `marginal_rate` (both in percent).
pub fn tax_equivalent_yield(tax_free_yield: f64, marginal_rate: f64) -> f64 {
    if marginal_rate >= 100.0 {
        return 0.0;
    }
    round2(tax_free_yield / (1.0 - marginal_rate / 100.0))
}
