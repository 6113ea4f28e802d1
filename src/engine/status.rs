// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget consumption at or above this percentage is `Caution`.
pub const CAUTION_THRESHOLD: f64 = 80.0;
/// Budget consumption at or above this percentage is `Danger`.
pub const DANGER_THRESHOLD: f64 = 100.0;

/// Three-level RAG severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Caution,
    Danger,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Caution => "caution",
            Status::Danger => "danger",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Safe => "Safe",
            Status::Caution => "Caution",
            Status::Danger => "Danger",
        })
    }
}

/// Budget-consumption policy, used for nominal, ratio and projection
/// achievement. Undefined achievement (no target) is `Safe`.
pub fn classify_budget(achievement_pct: Option<f64>) -> Status {
    match achievement_pct {
        None => Status::Safe,
        Some(p) if p >= DANGER_THRESHOLD => Status::Danger,
        Some(p) if p >= CAUTION_THRESHOLD => Status::Caution,
        Some(_) => Status::Safe,
    }
}

/// Growth policy for year-over-year: any positive growth is `Danger`.
pub fn classify_growth(growth_pct: Option<f64>) -> Status {
    match growth_pct {
        Some(p) if p > 0.0 => Status::Danger,
        _ => Status::Safe,
    }
}
