// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! What-if overrides: replace one month's realized figures on a copy of the
//! inputs and run the unchanged calculators over it.

use crate::engine::dashboard::{Ceilings, KpiSet, SegmentKpis, compute_kpis};
use crate::engine::round2;
use crate::engine::series::{Month, Segment, SegmentSeries, SeriesSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentOverride {
    pub non_kur: Option<f64>,
    pub kur: Option<f64>,
}

impl SegmentOverride {
    pub fn get(&self, segment: Segment) -> Option<f64> {
        match segment {
            Segment::NonKur => self.non_kur,
            Segment::Kur => self.kur,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.non_kur.is_none() && self.kur.is_none()
    }

    fn apply(&self, series: &SegmentSeries, month: Month) -> SegmentSeries {
        let mut out = *series;
        for segment in Segment::ALL {
            if let Some(v) = self.get(segment) {
                *out.get_mut(segment) = series.get(segment).with_override(month, v);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub month: Month,
    pub expense: SegmentOverride,
    pub premium: SegmentOverride,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.expense.is_empty() && self.premium.is_empty()
    }
}

/// A copy of `series` with the overridden realized slots replaced.
pub fn apply_overrides(series: &SeriesSet, overrides: &Overrides) -> SeriesSet {
    SeriesSet {
        realized_expense: overrides
            .expense
            .apply(&series.realized_expense, overrides.month),
        realized_premium: overrides
            .premium
            .apply(&series.realized_premium, overrides.month),
        ..*series
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub month: Month,
    pub baseline: KpiSet,
    pub simulated: KpiSet,
    /// Premium the combined segments need to bring the realized ratio down
    /// to the target ratio, from the simulated figures.
    pub minimum_premium: Option<f64>,
}

/// Premium at which `kpis`' realized expense meets the target ratio exactly.
/// `None` without a positive target ratio.
pub fn minimum_premium(kpis: &SegmentKpis) -> Option<f64> {
    kpis.ratio
        .target_ratio
        .filter(|r| *r > 0.0)
        .map(|r| round2(kpis.nominal.realized_to_date / (r / 100.0)))
}

pub fn simulate(series: &SeriesSet, ceilings: &Ceilings, overrides: &Overrides) -> SimulationOutcome {
    let month = overrides.month;
    let simulated = compute_kpis(&apply_overrides(series, overrides), ceilings, month);
    let minimum_premium = minimum_premium(&simulated.combined);
    SimulationOutcome {
        month,
        baseline: compute_kpis(series, ceilings, month),
        simulated,
        minimum_premium,
    }
}
