// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::nominal::NominalResult;
use crate::engine::round1;
use crate::engine::ratio::RatioResult;
use crate::engine::series::{Month, MonthlySeries, sum_to_month};
use crate::engine::status::{CAUTION_THRESHOLD, DANGER_THRESHOLD, Status};
use crate::engine::yoy::YoyResult;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Nominal,
    Ratio,
    #[serde(rename = "YoY")]
    Yoy,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parameter::Nominal => "Nominal",
            Parameter::Ratio => "Ratio",
            Parameter::Yoy => "YoY",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Status,
    pub parameter: Parameter,
    pub message: String,
}

impl Warning {
    fn new(severity: Status, parameter: Parameter, message: String) -> Self {
        Warning {
            severity,
            parameter,
            message,
        }
    }
}

/// Threshold alerts for one segment, in nominal, ratio, YoY order.
pub fn collect_warnings(
    nominal: &NominalResult,
    ratio: &RatioResult,
    yoy: &YoyResult,
    segment: &str,
) -> Vec<Warning> {
    let mut out = Vec::new();

    match nominal.achievement_pct {
        Some(pct) if pct >= DANGER_THRESHOLD => out.push(Warning::new(
            Status::Danger,
            Parameter::Nominal,
            format!(
                "{}: realized expense EXCEEDED the YTD target ({:.1}%), remaining budget {:.2} million",
                segment,
                round1(pct),
                nominal.remaining_budget
            ),
        )),
        Some(pct) if pct >= CAUTION_THRESHOLD => out.push(Warning::new(
            Status::Caution,
            Parameter::Nominal,
            format!(
                "{}: realized expense is approaching the YTD target ({:.1}%)",
                segment,
                round1(pct)
            ),
        )),
        Some(_) => {}
        // No target to measure against, only the absolute remainder.
        None if nominal.remaining_budget < 0.0 => out.push(Warning::new(
            Status::Danger,
            Parameter::Nominal,
            format!(
                "{}: remaining budget is already NEGATIVE ({:.2} million)",
                segment, nominal.remaining_budget
            ),
        )),
        None => {}
    }

    match ratio.achievement_pct {
        Some(pct) if pct >= DANGER_THRESHOLD => out.push(Warning::new(
            Status::Danger,
            Parameter::Ratio,
            format!(
                "{}: marketing expense ratio EXCEEDED the target ({:.1}%)",
                segment,
                round1(pct)
            ),
        )),
        Some(pct) if pct >= CAUTION_THRESHOLD => out.push(Warning::new(
            Status::Caution,
            Parameter::Ratio,
            format!(
                "{}: marketing expense ratio is approaching the target ({:.1}%)",
                segment,
                round1(pct)
            ),
        )),
        _ => {}
    }

    if let Some(growth) = yoy.growth_pct.filter(|g| *g > 0.0) {
        out.push(Warning::new(
            Status::Danger,
            Parameter::Yoy,
            format!(
                "{}: marketing expense GREW {:.1}% against last year",
                segment,
                round1(growth)
            ),
        ));
    }

    out
}

/// First month after `last_data_month` whose cumulative target would be
/// overrun if spending continued at the average monthly rate so far.
///
/// Months without a positive target are skipped. `None` when there is no
/// data yet, nothing has been spent, or no breach happens by December.
pub fn forecast_breach_month(
    realized: &MonthlySeries,
    target_ytd: &MonthlySeries,
    last_data_month: Option<Month>,
) -> Option<Month> {
    let last = last_data_month?;
    let ytd = sum_to_month(realized, last);
    if ytd <= 0.0 {
        return None;
    }
    let per_month = ytd / (last.index() as f64 + 1.0);

    last.following().find(|m| match target_ytd.get(*m) {
        Some(target) if target > 0.0 => {
            let offset = (m.index() - last.index()) as f64;
            ytd + per_month * offset > target
        }
        _ => false,
    })
}
