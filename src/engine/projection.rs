// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mid-month projection: prior cumulative + first-half actual + second-half
//! estimate, compared with the month's cumulative target. A straight sum,
//! no statistics.

use crate::engine::series::{Month, Segment, SeriesSet, sum_to_month};
use crate::engine::status::{Status, classify_budget};
use crate::engine::{percent_of, round2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub prior_cumulative: f64,
    pub first_half_actual: f64,
    pub second_half_estimate: f64,
    pub projected_total: f64,
    pub forward_target: f64,
    pub achievement_pct: Option<f64>,
    pub remaining_budget: f64,
    pub status: Status,
}

pub fn compute_projection(
    prior_cumulative: f64,
    first_half_actual: f64,
    second_half_estimate: f64,
    forward_target: f64,
) -> ProjectionResult {
    let projected_total = round2(prior_cumulative + first_half_actual + second_half_estimate);
    let achievement_pct = percent_of(projected_total, forward_target);
    ProjectionResult {
        prior_cumulative,
        first_half_actual,
        second_half_estimate,
        projected_total,
        forward_target,
        achievement_pct,
        remaining_budget: round2(forward_target - projected_total),
        status: classify_budget(achievement_pct),
    }
}

/// Half-month figures for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HalfMonth {
    pub first_half: f64,
    pub second_half: f64,
}

/// Projection inputs for the month in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub month: Month,
    pub non_kur: HalfMonth,
    pub kur: HalfMonth,
}

impl ProjectionInputs {
    pub fn new(month: Month) -> Self {
        ProjectionInputs {
            month,
            non_kur: HalfMonth::default(),
            kur: HalfMonth::default(),
        }
    }

    pub fn get(&self, segment: Segment) -> &HalfMonth {
        match segment {
            Segment::NonKur => &self.non_kur,
            Segment::Kur => &self.kur,
        }
    }

    pub fn get_mut(&mut self, segment: Segment) -> &mut HalfMonth {
        match segment {
            Segment::NonKur => &mut self.non_kur,
            Segment::Kur => &mut self.kur,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    pub month: Month,
    pub non_kur: ProjectionResult,
    pub kur: ProjectionResult,
    pub combined: ProjectionResult,
}

/// Projects every segment for `inputs.month`. January has no prior period
/// to build on and yields `None`.
pub fn project_segments(series: &SeriesSet, inputs: &ProjectionInputs) -> Option<ProjectionSet> {
    let prev = inputs.month.prev()?;
    let month = inputs.month;

    let prior_nk = sum_to_month(&series.realized_expense.non_kur, prev);
    let prior_k = sum_to_month(&series.realized_expense.kur, prev);
    let target_nk = series.target_expense.non_kur.value_or_zero(month);
    let target_k = series.target_expense.kur.value_or_zero(month);

    let non_kur = compute_projection(
        prior_nk,
        inputs.non_kur.first_half,
        inputs.non_kur.second_half,
        target_nk,
    );
    let kur = compute_projection(
        prior_k,
        inputs.kur.first_half,
        inputs.kur.second_half,
        target_k,
    );
    let combined = compute_projection(
        prior_nk + prior_k,
        inputs.non_kur.first_half + inputs.kur.first_half,
        inputs.non_kur.second_half + inputs.kur.second_half,
        target_nk + target_k,
    );

    Some(ProjectionSet {
        month,
        non_kur,
        kur,
        combined,
    })
}
