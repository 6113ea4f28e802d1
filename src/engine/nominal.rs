// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::series::{Month, MonthlySeries, sum_to_month};
use crate::engine::status::{Status, classify_budget};
use crate::engine::{percent_of, round2};
use serde::{Deserialize, Serialize};

/// Realized expense against the year-to-date target and the annual ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalResult {
    pub realized_to_date: f64,
    pub target_to_date: f64,
    pub achievement_pct: Option<f64>,
    pub ceiling_pct: Option<f64>,
    /// Target minus realized; negative once the target is overrun.
    pub remaining_budget: f64,
    pub status: Status,
}

impl NominalResult {
    fn from_totals(realized_to_date: f64, target_to_date: f64, annual_ceiling: f64) -> Self {
        let achievement_pct = percent_of(realized_to_date, target_to_date);
        NominalResult {
            realized_to_date,
            target_to_date,
            achievement_pct,
            ceiling_pct: percent_of(realized_to_date, annual_ceiling),
            remaining_budget: round2(target_to_date - realized_to_date),
            status: classify_budget(achievement_pct),
        }
    }
}

/// Nominal KPI for one segment.
///
/// `realized` holds per-month amounts and is summed through `month`;
/// `target_ytd` already holds cumulative figures, so only its `month` slot
/// is read.
pub fn compute_nominal(
    realized: &MonthlySeries,
    target_ytd: &MonthlySeries,
    annual_ceiling: f64,
    month: Month,
) -> NominalResult {
    let realized_to_date = sum_to_month(realized, month);
    let target_to_date = target_ytd.value_or_zero(month);
    NominalResult::from_totals(realized_to_date, target_to_date, annual_ceiling)
}

/// Combines two segment results from their already-rounded totals.
pub fn combine_nominal(
    a: &NominalResult,
    b: &NominalResult,
    combined_ceiling: f64,
) -> NominalResult {
    let realized_to_date = round2(a.realized_to_date + b.realized_to_date);
    let target_to_date = round2(a.target_to_date + b.target_to_date);
    NominalResult::from_totals(realized_to_date, target_to_date, combined_ceiling)
}
