// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::nominal::{NominalResult, combine_nominal, compute_nominal};
use crate::engine::projection::{ProjectionInputs, ProjectionSet, project_segments};
use crate::engine::ratio::{RatioInputs, RatioResult, combine_ratio, compute_ratio};
use crate::engine::round2;
use crate::engine::series::{Month, Segment, SeriesSet};
use crate::engine::warnings::{Warning, collect_warnings, forecast_breach_month};
use crate::engine::yoy::{YoyResult, combine_yoy, compute_yoy};
use serde::{Deserialize, Serialize};

pub const COMBINED_LABEL: &str = "Combined";

/// Annual budget ceilings per segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ceilings {
    pub non_kur: f64,
    pub kur: f64,
}

impl Ceilings {
    pub fn combined(&self) -> f64 {
        round2(self.non_kur + self.kur)
    }

    pub fn get(&self, segment: Segment) -> f64 {
        match segment {
            Segment::NonKur => self.non_kur,
            Segment::Kur => self.kur,
        }
    }

    pub fn set(&mut self, segment: Segment, amount: f64) {
        match segment {
            Segment::NonKur => self.non_kur = amount,
            Segment::Kur => self.kur = amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentKpis {
    pub nominal: NominalResult,
    pub ratio: RatioResult,
    pub yoy: YoyResult,
}

impl SegmentKpis {
    pub fn warnings(&self, label: &str) -> Vec<Warning> {
        collect_warnings(&self.nominal, &self.ratio, &self.yoy, label)
    }
}

/// KPIs for both segments and their combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub non_kur: SegmentKpis,
    pub kur: SegmentKpis,
    pub combined: SegmentKpis,
}

impl KpiSet {
    /// Rows in display order with their labels.
    pub fn labelled(&self) -> [(&'static str, &SegmentKpis); 3] {
        [
            (Segment::NonKur.label(), &self.non_kur),
            (Segment::Kur.label(), &self.kur),
            (COMBINED_LABEL, &self.combined),
        ]
    }

    /// Warnings for Non KUR, KUR and Combined, in that order.
    pub fn warnings(&self) -> Vec<Warning> {
        self.labelled()
            .into_iter()
            .flat_map(|(label, kpis)| kpis.warnings(label))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub month: Month,
    pub kpis: KpiSet,
    pub projection: Option<ProjectionSet>,
    pub warnings: Vec<Warning>,
    /// Month in which combined spend is forecast to overrun its target.
    pub breach_month: Option<Month>,
}

fn ratio_inputs(series: &SeriesSet, segment: Segment) -> RatioInputs<'_> {
    RatioInputs {
        expense: series.realized_expense.get(segment),
        premium: series.realized_premium.get(segment),
        target_expense: series.target_expense.get(segment),
        target_premium: series.target_premium.get(segment),
    }
}

fn segment_kpis(series: &SeriesSet, ceilings: &Ceilings, segment: Segment, month: Month) -> SegmentKpis {
    let r = ratio_inputs(series, segment);
    SegmentKpis {
        nominal: compute_nominal(
            series.realized_expense.get(segment),
            series.target_expense.get(segment),
            ceilings.get(segment),
            month,
        ),
        ratio: compute_ratio(r.expense, r.premium, r.target_expense, r.target_premium, month),
        yoy: compute_yoy(
            series.realized_expense.get(segment),
            series.prior_expense.get(segment),
            month,
        ),
    }
}

/// Nominal, ratio and YoY for every segment at `month`.
pub fn compute_kpis(series: &SeriesSet, ceilings: &Ceilings, month: Month) -> KpiSet {
    let non_kur = segment_kpis(series, ceilings, Segment::NonKur, month);
    let kur = segment_kpis(series, ceilings, Segment::Kur, month);
    let combined = SegmentKpis {
        nominal: combine_nominal(&non_kur.nominal, &kur.nominal, ceilings.combined()),
        ratio: combine_ratio(
            ratio_inputs(series, Segment::NonKur),
            ratio_inputs(series, Segment::Kur),
            month,
        ),
        yoy: combine_yoy(&non_kur.yoy, &kur.yoy),
    };
    KpiSet {
        non_kur,
        kur,
        combined,
    }
}

/// Everything shown for one reporting month.
pub fn compute_dashboard(
    series: &SeriesSet,
    ceilings: &Ceilings,
    projection: &ProjectionInputs,
    month: Month,
) -> Dashboard {
    let kpis = compute_kpis(series, ceilings, month);
    let warnings = kpis.warnings();
    let breach_month = forecast_breach_month(
        &series.realized_expense.combined(),
        &series.target_expense.combined(),
        Some(month),
    );
    log::debug!(
        "dashboard for {}: {} warning(s), breach month {:?}",
        month,
        warnings.len(),
        breach_month.map(Month::name)
    );
    Dashboard {
        month,
        kpis,
        projection: project_segments(series, projection),
        warnings,
        breach_month,
    }
}
