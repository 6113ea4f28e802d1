// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{Segment, SeriesKind};
use crate::models::BudgetState;
use crate::utils::{fmt_number, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let state = db::load_state(conn)?;
    let rows = find_issues(&state);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// `[issue, detail]` rows for every inconsistency in `state`.
pub fn find_issues(state: &BudgetState) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let series = &state.series;

    // 1) Year-to-date targets must not shrink
    for kind in SeriesKind::ALL.into_iter().filter(|k| k.is_cumulative()) {
        for segment in Segment::ALL {
            let mut highest: Option<(f64, &str)> = None;
            for (month, value) in series.get(kind).get(segment).iter() {
                let Some(v) = value else { continue };
                match highest {
                    Some((max, max_month)) if v < max => rows.push(vec![
                        "target_not_cumulative".into(),
                        format!(
                            "{} {} {}: {} is below {} ({})",
                            kind,
                            segment.as_str(),
                            month.name(),
                            fmt_number(v),
                            fmt_number(max),
                            max_month
                        ),
                    ]),
                    _ => highest = Some((v, month.name())),
                }
            }
        }
    }

    // 2) Negative inputs
    for kind in SeriesKind::ALL {
        for segment in Segment::ALL {
            for (month, value) in series.get(kind).get(segment).iter() {
                if let Some(v) = value.filter(|v| *v < 0.0) {
                    rows.push(vec![
                        "negative_value".into(),
                        format!(
                            "{} {} {}: {}",
                            kind,
                            segment.as_str(),
                            month.name(),
                            fmt_number(v)
                        ),
                    ]);
                }
            }
        }
    }
    let ceilings = state.ceilings.active();
    for segment in Segment::ALL {
        if ceilings.get(segment) < 0.0 {
            rows.push(vec![
                "negative_value".into(),
                format!("ceiling {}: {}", segment.as_str(), fmt_number(ceilings.get(segment))),
            ]);
        }
        let half = state.projection.get(segment);
        if half.first_half < 0.0 || half.second_half < 0.0 {
            rows.push(vec![
                "negative_value".into(),
                format!("projection {}", segment.as_str()),
            ]);
        }
    }

    // 3) Spending recorded against a month with no expense target
    for segment in Segment::ALL {
        let realized = series.realized_expense.get(segment);
        let target = series.target_expense.get(segment);
        for (month, value) in realized.iter() {
            if value.is_some() && target.get(month).is_none_or(|t| t == 0.0) {
                rows.push(vec![
                    "realized_without_target".into(),
                    format!("{} {}", segment.as_str(), month.name()),
                ]);
            }
        }
    }

    // 4) Realized data but no ceiling to measure it against
    for segment in Segment::ALL {
        if !series.realized_expense.get(segment).is_empty() && ceilings.get(segment) == 0.0 {
            rows.push(vec![
                "missing_ceiling".into(),
                format!("{} ({} ceiling)", segment.as_str(), state.ceilings.active),
            ]);
        }
    }

    rows
}
