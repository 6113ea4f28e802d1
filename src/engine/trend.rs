// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-by-month year-to-date trends for charts and reports.

use crate::engine::series::{Month, SegmentSeries, sum_to_month};
use crate::engine::{percent_of, round2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeRow {
    pub month: Month,
    /// Combined realized expense, year to date.
    pub realized: f64,
    /// Combined cumulative expense target; absent months count as zero.
    pub target: f64,
}

/// Combined realized-vs-target expense at every month of the year.
pub fn cumulative_ytd(realized: &SegmentSeries, target_ytd: &SegmentSeries) -> Vec<CumulativeRow> {
    Month::all()
        .map(|m| CumulativeRow {
            month: m,
            realized: round2(sum_to_month(&realized.non_kur, m) + sum_to_month(&realized.kur, m)),
            target: round2(
                target_ytd.non_kur.value_or_zero(m) + target_ytd.kur.value_or_zero(m),
            ),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioTrendRow {
    pub month: Month,
    pub non_kur: Option<f64>,
    pub kur: Option<f64>,
    pub combined: Option<f64>,
}

/// Realized expense/premium ratio (whole percent) year to date, per month.
///
/// A month with no realized expense entered for either segment has no
/// ratios at all, even when earlier months would give one.
pub fn ratio_trend(expense: &SegmentSeries, premium: &SegmentSeries) -> Vec<RatioTrendRow> {
    Month::all()
        .map(|m| {
            let has_data = expense.non_kur.get(m).is_some() || expense.kur.get(m).is_some();
            if !has_data {
                return RatioTrendRow {
                    month: m,
                    non_kur: None,
                    kur: None,
                    combined: None,
                };
            }
            let exp_nk = sum_to_month(&expense.non_kur, m);
            let exp_k = sum_to_month(&expense.kur, m);
            let prem_nk = sum_to_month(&premium.non_kur, m);
            let prem_k = sum_to_month(&premium.kur, m);
            RatioTrendRow {
                month: m,
                non_kur: percent_of(exp_nk, prem_nk),
                kur: percent_of(exp_k, prem_k),
                combined: percent_of(exp_nk + exp_k, prem_nk + prem_k),
            }
        })
        .collect()
}
