// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly series, months and segments.

use crate::engine::round2;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A month of the fiscal year, 0 = January .. 11 = December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(0);
    pub const DECEMBER: Month = Month(11);

    pub fn new(index: i64) -> Result<Self, EngineError> {
        if (0..12).contains(&index) {
            Ok(Month(index as u8))
        } else {
            Err(EngineError::InvalidMonth(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.index()]
    }

    /// The month before this one, `None` for January.
    pub fn prev(self) -> Option<Month> {
        self.0.checked_sub(1).map(Month)
    }

    /// Months strictly after this one, in calendar order.
    pub fn following(self) -> impl Iterator<Item = Month> {
        (self.0 + 1..12).map(Month)
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (0..12).map(Month)
    }
}

impl TryFrom<i64> for Month {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Month::new(value)
    }
}

impl From<Month> for i64 {
    fn from(m: Month) -> i64 {
        m.0 as i64
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a 1-based month number ("9") or an English name or prefix
/// ("September", "sep").
impl FromStr for Month {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Month::new(n - 1);
        }
        let lower = s.to_lowercase();
        if lower.len() >= 3 {
            for m in Month::all() {
                if m.name().to_lowercase().starts_with(&lower) {
                    return Ok(m);
                }
            }
        }
        Err(EngineError::UnknownMonthName(s.to_string()))
    }
}

/// Twelve optional values, one per month. `None` means "nothing entered",
/// which is distinct from an entered zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries([Option<f64>; 12]);

impl MonthlySeries {
    pub fn empty() -> Self {
        MonthlySeries([None; 12])
    }

    pub fn from_values(values: [Option<f64>; 12]) -> Self {
        MonthlySeries(values)
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.0[month.index()]
    }

    /// Direct read of one slot, absent as zero.
    pub fn value_or_zero(&self, month: Month) -> f64 {
        self.get(month).unwrap_or(0.0)
    }

    pub fn set(&mut self, month: Month, value: Option<f64>) {
        self.0[month.index()] = value;
    }

    pub fn values(&self) -> &[Option<f64>; 12] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<f64>)> + '_ {
        Month::all().map(move |m| (m, self.get(m)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Copy of this series with one slot replaced.
    pub fn with_override(&self, month: Month, value: f64) -> Self {
        let mut out = *self;
        out.set(month, Some(value));
        out
    }

    /// Element-wise sum of two series. A slot is present when either input
    /// slot is present, treating the other side as zero.
    pub fn combine(&self, other: &MonthlySeries) -> Self {
        let mut out = MonthlySeries::empty();
        for m in Month::all() {
            out.set(
                m,
                match (self.get(m), other.get(m)) {
                    (None, None) => None,
                    (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                },
            );
        }
        out
    }
}

impl TryFrom<Vec<Option<f64>>> for MonthlySeries {
    type Error = EngineError;

    fn try_from(values: Vec<Option<f64>>) -> Result<Self, Self::Error> {
        let len = values.len();
        let arr: [Option<f64>; 12] = values
            .try_into()
            .map_err(|_| EngineError::SeriesLength(len))?;
        Ok(MonthlySeries(arr))
    }
}

/// Year-to-date sum of `series` from January through `through` inclusive,
/// rounded to 2 decimals. Absent slots contribute zero, so an all-absent
/// prefix yields 0. `None` (a bound before January) also yields 0.
pub fn sum_to_month(series: &MonthlySeries, through: impl Into<Option<Month>>) -> f64 {
    let Some(through) = through.into() else {
        return 0.0;
    };
    let total = series.0[..=through.index()]
        .iter()
        .flatten()
        .fold(0.0, |acc, v| acc + v);
    round2(total)
}

/// Product segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    NonKur,
    Kur,
}

impl Segment {
    pub const ALL: [Segment; 2] = [Segment::NonKur, Segment::Kur];

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::NonKur => "non_kur",
            Segment::Kur => "kur",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::NonKur => "Non KUR",
            Segment::Kur => "KUR",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Segment {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "non_kur" | "nonkur" => Ok(Segment::NonKur),
            "kur" => Ok(Segment::Kur),
            _ => Err(EngineError::UnknownSegment(s.to_string())),
        }
    }
}

/// One series per segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentSeries {
    pub non_kur: MonthlySeries,
    pub kur: MonthlySeries,
}

impl SegmentSeries {
    pub fn get(&self, segment: Segment) -> &MonthlySeries {
        match segment {
            Segment::NonKur => &self.non_kur,
            Segment::Kur => &self.kur,
        }
    }

    pub fn get_mut(&mut self, segment: Segment) -> &mut MonthlySeries {
        match segment {
            Segment::NonKur => &mut self.non_kur,
            Segment::Kur => &mut self.kur,
        }
    }

    pub fn combined(&self) -> MonthlySeries {
        self.non_kur.combine(&self.kur)
    }
}

/// The five input series the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Year-to-date cumulative expense target per month.
    TargetExpense,
    /// Year-to-date cumulative premium target per month.
    TargetPremium,
    /// Realized expense, per-month amounts.
    RealizedExpense,
    /// Realized premium, per-month amounts.
    RealizedPremium,
    /// Prior-year realized expense, per-month amounts.
    PriorExpense,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 5] = [
        SeriesKind::TargetExpense,
        SeriesKind::TargetPremium,
        SeriesKind::RealizedExpense,
        SeriesKind::RealizedPremium,
        SeriesKind::PriorExpense,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SeriesKind::TargetExpense => "target_expense",
            SeriesKind::TargetPremium => "target_premium",
            SeriesKind::RealizedExpense => "realized_expense",
            SeriesKind::RealizedPremium => "realized_premium",
            SeriesKind::PriorExpense => "prior_expense",
        }
    }

    pub fn is_cumulative(self) -> bool {
        matches!(self, SeriesKind::TargetExpense | SeriesKind::TargetPremium)
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace('-', "_");
        SeriesKind::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| EngineError::UnknownSeriesKind(s.to_string()))
    }
}

/// All input series, per segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSet {
    pub target_expense: SegmentSeries,
    pub target_premium: SegmentSeries,
    pub realized_expense: SegmentSeries,
    pub realized_premium: SegmentSeries,
    pub prior_expense: SegmentSeries,
}

impl SeriesSet {
    pub fn get(&self, kind: SeriesKind) -> &SegmentSeries {
        match kind {
            SeriesKind::TargetExpense => &self.target_expense,
            SeriesKind::TargetPremium => &self.target_premium,
            SeriesKind::RealizedExpense => &self.realized_expense,
            SeriesKind::RealizedPremium => &self.realized_premium,
            SeriesKind::PriorExpense => &self.prior_expense,
        }
    }

    pub fn get_mut(&mut self, kind: SeriesKind) -> &mut SegmentSeries {
        match kind {
            SeriesKind::TargetExpense => &mut self.target_expense,
            SeriesKind::TargetPremium => &mut self.target_premium,
            SeriesKind::RealizedExpense => &mut self.realized_expense,
            SeriesKind::RealizedPremium => &mut self.realized_premium,
            SeriesKind::PriorExpense => &mut self.prior_expense,
        }
    }
}
