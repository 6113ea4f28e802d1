// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{Segment, SeriesKind};
use crate::models::ExportData;
use crate::utils::{export_filename, now_rfc3339};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CSV_HEADERS: [&str; 4] = ["field", "segment", "month", "value"];

/// One line of the long-format CSV export. `segment` and `month` are empty
/// for fields that have no such dimension; months are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRecord {
    pub field: String,
    pub segment: String,
    pub month: String,
    pub value: String,
}

impl CsvRecord {
    fn scalar(field: &str, value: impl ToString) -> Self {
        CsvRecord {
            field: field.to_string(),
            segment: String::new(),
            month: String::new(),
            value: value.to_string(),
        }
    }

    fn segmented(field: &str, segment: Segment, value: f64) -> Self {
        CsvRecord {
            field: field.to_string(),
            segment: segment.as_str().to_string(),
            month: String::new(),
            value: value.to_string(),
        }
    }
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    if fmt != "json" && fmt != "csv" {
        bail!("Unknown format: {} (use json|csv)", fmt);
    }
    let state = db::load_state(conn)?;
    let out = match sub.get_one::<String>("out") {
        Some(p) => p.clone(),
        None => export_filename(
            &state.profile.branch_name,
            state.profile.current_year,
            chrono::Local::now().date_naive(),
            &fmt,
        ),
    };
    let data = ExportData::from_state(&state, now_rfc3339());
    match fmt.as_str() {
        "csv" => write_csv(&out, &data)?,
        _ => write_json(&out, &data)?,
    }
    log::info!("exported {} to {}", fmt, out);
    println!("Exported data to {}", out);
    Ok(())
}

pub fn write_json(path: impl AsRef<Path>, data: &ExportData) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, serde_json::to_string_pretty(data)?)
        .with_context(|| format!("Write {}", path.display()))
}

/// Flattens an export into long-format records. Absent series slots are
/// left out.
pub fn to_records(data: &ExportData) -> Vec<CsvRecord> {
    let mut out = vec![
        CsvRecord::scalar("version", &data.version),
        CsvRecord::scalar("exported_at", &data.exported_at),
        CsvRecord::scalar("branch_name", &data.profile.branch_name),
        CsvRecord::scalar("region", &data.profile.region),
        CsvRecord::scalar("current_year", data.profile.current_year),
        CsvRecord::scalar("prior_year", data.profile.prior_year),
    ];
    for segment in Segment::ALL {
        let ceiling = match segment {
            Segment::NonKur => data.ceilings.non_kur,
            Segment::Kur => data.ceilings.kur,
        };
        out.push(CsvRecord::segmented("ceiling", segment, ceiling));
    }
    for kind in SeriesKind::ALL {
        let series = match kind {
            SeriesKind::TargetExpense => &data.target_expense,
            SeriesKind::TargetPremium => &data.target_premium,
            SeriesKind::RealizedExpense => &data.realized_expense,
            SeriesKind::RealizedPremium => &data.realized_premium,
            SeriesKind::PriorExpense => &data.prior_expense,
        };
        for segment in Segment::ALL {
            for (month, value) in series.get(segment).iter() {
                if let Some(v) = value {
                    out.push(CsvRecord {
                        field: kind.as_str().to_string(),
                        segment: segment.as_str().to_string(),
                        month: (month.index() + 1).to_string(),
                        value: v.to_string(),
                    });
                }
            }
        }
    }
    out.push(CsvRecord::scalar(
        "projection_month",
        data.projection.month.index() + 1,
    ));
    for segment in Segment::ALL {
        let half = data.projection.get(segment);
        out.push(CsvRecord::segmented("first_half", segment, half.first_half));
        out.push(CsvRecord::segmented("second_half", segment, half.second_half));
    }
    out
}

pub fn write_csv(path: impl AsRef<Path>, data: &ExportData) -> Result<()> {
    let path = path.as_ref();
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("Create {}", path.display()))?;
    for rec in to_records(data) {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}
