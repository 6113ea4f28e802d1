// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{Ceilings, Month, ProjectionInputs, SegmentSeries, SeriesSet};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub branch_name: String,
    pub region: String,
    pub current_year: i32,
    pub prior_year: i32,
}

impl Default for Profile {
    fn default() -> Self {
        let year = chrono::Local::now().year();
        Profile {
            branch_name: String::new(),
            region: String::new(),
            current_year: year,
            prior_year: year - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeilingVersion {
    #[default]
    Initial,
    Revised,
}

impl CeilingVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            CeilingVersion::Initial => "initial",
            CeilingVersion::Revised => "revised",
        }
    }
}

impl fmt::Display for CeilingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CeilingVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initial" => Ok(CeilingVersion::Initial),
            "revised" | "revision" => Ok(CeilingVersion::Revised),
            other => Err(anyhow::anyhow!(
                "Unknown ceiling version '{}' (use initial|revised)",
                other
            )),
        }
    }
}

/// Initial annual ceilings plus an optional mid-year revision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CeilingRevisions {
    pub initial: Ceilings,
    pub revised: Option<Ceilings>,
    pub active: CeilingVersion,
}

impl CeilingRevisions {
    /// The ceilings the engine should use.
    pub fn active(&self) -> Ceilings {
        match (self.active, self.revised) {
            (CeilingVersion::Revised, Some(revised)) => revised,
            _ => self.initial,
        }
    }

    pub fn version_mut(&mut self, version: CeilingVersion) -> Option<&mut Ceilings> {
        match version {
            CeilingVersion::Initial => Some(&mut self.initial),
            CeilingVersion::Revised => self.revised.as_mut(),
        }
    }

    /// Starts a revision from the initial ceilings and makes it active.
    pub fn create_revision(&mut self) {
        self.revised = Some(self.initial);
        self.active = CeilingVersion::Revised;
    }

    pub fn drop_revision(&mut self) {
        self.revised = None;
        self.active = CeilingVersion::Initial;
    }
}

/// Everything the user maintains for one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetState {
    pub profile: Profile,
    pub ceilings: CeilingRevisions,
    pub series: SeriesSet,
    pub projection: ProjectionInputs,
}

impl Default for BudgetState {
    fn default() -> Self {
        BudgetState {
            profile: Profile::default(),
            ceilings: CeilingRevisions::default(),
            series: SeriesSet::default(),
            projection: ProjectionInputs::new(current_month()),
        }
    }
}

/// The calendar month in progress.
pub fn current_month() -> Month {
    Month::new(chrono::Local::now().month0() as i64).unwrap_or(Month::JANUARY)
}

/// Default reporting month: the last completed month, January at the latest.
pub fn default_active_month() -> Month {
    current_month().prev().unwrap_or(Month::JANUARY)
}

/// Ceilings as written to an export file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportedCeilings {
    pub non_kur: f64,
    pub kur: f64,
    pub combined: f64,
}

impl From<Ceilings> for ExportedCeilings {
    fn from(c: Ceilings) -> Self {
        ExportedCeilings {
            non_kur: c.non_kur,
            kur: c.kur,
            combined: c.combined(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub version: String,
    pub exported_at: String,
    pub profile: Profile,
    pub ceilings: ExportedCeilings,
    pub target_expense: SegmentSeries,
    pub target_premium: SegmentSeries,
    pub realized_expense: SegmentSeries,
    pub realized_premium: SegmentSeries,
    pub prior_expense: SegmentSeries,
    pub projection: ProjectionInputs,
}

impl ExportData {
    pub fn from_state(state: &BudgetState, exported_at: String) -> Self {
        ExportData {
            version: EXPORT_VERSION.to_string(),
            exported_at,
            profile: state.profile.clone(),
            ceilings: state.ceilings.active().into(),
            target_expense: state.series.target_expense,
            target_premium: state.series.target_premium,
            realized_expense: state.series.realized_expense,
            realized_premium: state.series.realized_premium,
            prior_expense: state.series.prior_expense,
            projection: state.projection,
        }
    }

    /// Writes this export over `state`. Ceilings land in whichever version
    /// is currently active.
    pub fn apply_to(&self, state: &mut BudgetState) {
        state.profile = self.profile.clone();
        let target = match state.ceilings.active {
            CeilingVersion::Revised if state.ceilings.revised.is_some() => {
                state.ceilings.revised.as_mut()
            }
            _ => Some(&mut state.ceilings.initial),
        };
        if let Some(c) = target {
            c.non_kur = self.ceilings.non_kur;
            c.kur = self.ceilings.kur;
        }
        state.series = SeriesSet {
            target_expense: self.target_expense,
            target_premium: self.target_premium,
            realized_expense: self.realized_expense,
            realized_premium: self.realized_premium,
            prior_expense: self.prior_expense,
        };
        state.projection = self.projection;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: i64,
    pub label: String,
    pub created_at: String,
    pub updated_at: String,
    pub active: bool,
}
