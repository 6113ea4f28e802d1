// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! KPI computation engine.
//!
//! Pure functions over monthly series: no I/O, no shared state. Every result
//! is computed fresh from its arguments.

pub mod dashboard;
pub mod nominal;
pub mod projection;
pub mod ratio;
pub mod series;
pub mod simulation;
pub mod status;
pub mod trend;
pub mod warnings;
pub mod yoy;

pub use dashboard::{Ceilings, Dashboard, KpiSet, SegmentKpis, compute_dashboard, compute_kpis};
pub use nominal::{NominalResult, combine_nominal, compute_nominal};
pub use projection::{
    HalfMonth, ProjectionInputs, ProjectionResult, ProjectionSet, compute_projection,
    project_segments,
};
pub use ratio::{RatioInputs, RatioResult, combine_ratio, compute_ratio};
pub use series::{
    MONTH_NAMES, Month, MonthlySeries, Segment, SegmentSeries, SeriesKind, SeriesSet,
    sum_to_month,
};
pub use simulation::{
    Overrides, SegmentOverride, SimulationOutcome, apply_overrides, minimum_premium, simulate,
};
pub use status::{Status, classify_budget, classify_growth};
pub use trend::{CumulativeRow, RatioTrendRow, cumulative_ytd, ratio_trend};
pub use warnings::{Parameter, Warning, collect_warnings, forecast_breach_month};
pub use yoy::{MonthlyYoyRow, YoyResult, combine_yoy, compute_yoy, monthly_yoy};

/// Half-up rounding to an integer (ties go towards +infinity).
///
/// `x - x.floor()` is exact for every finite f64, so the tie test never
/// misfires on values just below one half.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Round to 1 decimal place, half-up. Apply before `{:.1}`, which rounds
/// exact ties to even.
pub fn round1(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

/// Round an amount to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}

/// `numerator / denominator` as a whole-number percentage with 2 decimals,
/// or `None` when the denominator is not positive.
pub fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(round_half_up((numerator / denominator) * 10000.0) / 100.0)
    } else {
        None
    }
}
