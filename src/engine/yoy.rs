// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::series::{Month, MonthlySeries, SegmentSeries, sum_to_month};
use crate::engine::status::{Status, classify_growth};
use crate::engine::{percent_of, round2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YoyResult {
    pub current_to_date: f64,
    pub prior_to_date: f64,
    pub growth_pct: Option<f64>,
    pub status: Status,
}

impl YoyResult {
    fn from_totals(current_to_date: f64, prior_to_date: f64) -> Self {
        let growth_pct = percent_of(current_to_date - prior_to_date, prior_to_date);
        YoyResult {
            current_to_date,
            prior_to_date,
            growth_pct,
            status: classify_growth(growth_pct),
        }
    }
}

/// Year-to-date expense growth against the same period last year.
pub fn compute_yoy(current: &MonthlySeries, prior: &MonthlySeries, month: Month) -> YoyResult {
    YoyResult::from_totals(sum_to_month(current, month), sum_to_month(prior, month))
}

pub fn combine_yoy(a: &YoyResult, b: &YoyResult) -> YoyResult {
    YoyResult::from_totals(
        round2(a.current_to_date + b.current_to_date),
        round2(a.prior_to_date + b.prior_to_date),
    )
}

/// One month of the combined month-by-month comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyYoyRow {
    pub month: Month,
    /// False when neither year has any entry for this month.
    pub has_data: bool,
    pub prior: f64,
    pub current: f64,
    pub difference: f64,
    pub growth_pct: Option<f64>,
}

/// Month-by-month combined (both segments) expense, this year against last.
/// Values are single-month amounts, not year-to-date.
pub fn monthly_yoy(current: &SegmentSeries, prior: &SegmentSeries) -> Vec<MonthlyYoyRow> {
    let current = current.combined();
    let prior = prior.combined();
    Month::all()
        .map(|m| {
            let cur = current.value_or_zero(m);
            let pri = prior.value_or_zero(m);
            MonthlyYoyRow {
                month: m,
                has_data: current.get(m).is_some() || prior.get(m).is_some(),
                prior: pri,
                current: cur,
                difference: cur - pri,
                growth_pct: percent_of(cur - pri, pri),
            }
        })
        .collect()
}
