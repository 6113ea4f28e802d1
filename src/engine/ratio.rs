// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::percent_of;
use crate::engine::series::{Month, MonthlySeries, sum_to_month};
use crate::engine::status::{Status, classify_budget};
use serde::{Deserialize, Serialize};

/// Expense-to-premium ratio, realized against target. Ratios are whole
/// percentages (2.67 means 2.67%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub target_ratio: Option<f64>,
    pub realized_ratio: Option<f64>,
    /// Realized ratio as a percentage of the target ratio.
    pub achievement_pct: Option<f64>,
    pub status: Status,
}

/// The four series one segment's ratio is computed from.
#[derive(Debug, Clone, Copy)]
pub struct RatioInputs<'a> {
    pub expense: &'a MonthlySeries,
    pub premium: &'a MonthlySeries,
    pub target_expense: &'a MonthlySeries,
    pub target_premium: &'a MonthlySeries,
}

struct RatioTotals {
    expense: f64,
    premium: f64,
    target_expense: f64,
    target_premium: f64,
}

impl RatioInputs<'_> {
    fn totals(&self, month: Month) -> RatioTotals {
        RatioTotals {
            expense: sum_to_month(self.expense, month),
            premium: sum_to_month(self.premium, month),
            target_expense: self.target_expense.value_or_zero(month),
            target_premium: self.target_premium.value_or_zero(month),
        }
    }
}

fn ratio_from_totals(t: &RatioTotals) -> RatioResult {
    let target_ratio = percent_of(t.target_expense, t.target_premium);
    let realized_ratio = percent_of(t.expense, t.premium);
    let achievement_pct = match (target_ratio, realized_ratio) {
        (Some(target), Some(realized)) => percent_of(realized, target),
        _ => None,
    };
    RatioResult {
        target_ratio,
        realized_ratio,
        achievement_pct,
        status: classify_budget(achievement_pct),
    }
}

/// Ratio KPI for one segment. Targets are cumulative, read at `month`.
pub fn compute_ratio(
    expense: &MonthlySeries,
    premium: &MonthlySeries,
    target_expense: &MonthlySeries,
    target_premium: &MonthlySeries,
    month: Month,
) -> RatioResult {
    let inputs = RatioInputs {
        expense,
        premium,
        target_expense,
        target_premium,
    };
    ratio_from_totals(&inputs.totals(month))
}

/// Combined ratio: expense and premium are summed across segments first and
/// the ratio is taken of the sums.
pub fn combine_ratio(non_kur: RatioInputs<'_>, kur: RatioInputs<'_>, month: Month) -> RatioResult {
    let a = non_kur.totals(month);
    let b = kur.totals(month);
    ratio_from_totals(&RatioTotals {
        expense: a.expense + b.expense,
        premium: a.premium + b.premium,
        target_expense: a.target_expense + b.target_expense,
        target_premium: a.target_premium + b.target_premium,
    })
}
