// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Input-contract violations caught at the engine boundary.
///
/// Numeric edge cases (zero or absent denominators) are never errors; they
/// surface as `None` fields on the result records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid month index {0}, expected 0..=11")]
    InvalidMonth(i64),

    #[error("Unknown month '{0}'")]
    UnknownMonthName(String),

    #[error("Monthly series must have exactly 12 slots, got {0}")]
    SeriesLength(usize),

    #[error("Unknown segment '{0}' (use non-kur|kur)")]
    UnknownSegment(String),

    #[error("Unknown series kind '{0}'")]
    UnknownSeriesKind(String),
}
