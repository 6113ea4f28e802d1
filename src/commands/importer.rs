// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::exporter::{CSV_HEADERS, CsvRecord};
use crate::db;
use crate::engine::{Segment, SeriesKind};
use crate::models::{BudgetState, EXPORT_VERSION, ExportData};
use crate::utils::parse_month;
use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let data = read_export(path)?;
    let mut state = db::load_state(conn)?;
    data.apply_to(&mut state);
    db::save_state(conn, &state)?;
    log::info!("imported {} (exported at {})", path, data.exported_at);
    println!("Imported data from {}", path);
    Ok(())
}

/// Reads a `.json` or `.csv` export, picked by file extension.
pub fn read_export(path: impl AsRef<Path>) -> Result<ExportData> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let data = match ext.as_str() {
        "json" => read_json(path),
        "csv" => read_csv(path),
        other => bail!(
            "Unsupported file type '{}' for {} (use .json or .csv)",
            other,
            path.display()
        ),
    }
    .with_context(|| format!("{} is not a valid export", path.display()))?;
    if data.version != EXPORT_VERSION {
        log::warn!(
            "export version {} differs from {}, importing anyway",
            data.version,
            EXPORT_VERSION
        );
    }
    Ok(data)
}

fn read_json(path: &Path) -> Result<ExportData> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Read {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

fn stored_number(rec: &CsvRecord) -> Result<f64> {
    let v: f64 = rec
        .value
        .trim()
        .parse()
        .with_context(|| format!("Invalid number '{}' for {}", rec.value, rec.field))?;
    if !v.is_finite() {
        bail!("Non-finite number '{}' for {}", rec.value, rec.field);
    }
    Ok(v)
}

fn segment_of(rec: &CsvRecord) -> Result<Segment> {
    Ok(rec.segment.parse()?)
}

fn read_csv(path: &Path) -> Result<ExportData> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(CSV_HEADERS.iter().copied()) {
        bail!("Expected columns {}", CSV_HEADERS.join(","));
    }

    let mut data = ExportData::from_state(&BudgetState::default(), String::new());
    data.version = String::new();
    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let rec = result?;
        let row = line + 2;
        match rec.field.as_str() {
            "version" => data.version = rec.value.clone(),
            "exported_at" => data.exported_at = rec.value.clone(),
            "branch_name" => data.profile.branch_name = rec.value.clone(),
            "region" => data.profile.region = rec.value.clone(),
            "current_year" => {
                data.profile.current_year = rec
                    .value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid current_year on row {}", row))?
            }
            "prior_year" => {
                data.profile.prior_year = rec
                    .value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid prior_year on row {}", row))?
            }
            "ceiling" => {
                let v = stored_number(&rec)?;
                match segment_of(&rec)? {
                    Segment::NonKur => data.ceilings.non_kur = v,
                    Segment::Kur => data.ceilings.kur = v,
                }
            }
            "projection_month" => data.projection.month = parse_month(&rec.value)?,
            "first_half" => {
                data.projection.get_mut(segment_of(&rec)?).first_half = stored_number(&rec)?
            }
            "second_half" => {
                data.projection.get_mut(segment_of(&rec)?).second_half = stored_number(&rec)?
            }
            field => {
                let Ok(kind) = field.parse::<SeriesKind>() else {
                    log::warn!("skipping unknown field '{}' on row {}", field, row);
                    continue;
                };
                let segment = segment_of(&rec)?;
                let month = parse_month(&rec.month)
                    .with_context(|| format!("Row {}", row))?;
                let value = stored_number(&rec)?;
                let series = match kind {
                    SeriesKind::TargetExpense => &mut data.target_expense,
                    SeriesKind::TargetPremium => &mut data.target_premium,
                    SeriesKind::RealizedExpense => &mut data.realized_expense,
                    SeriesKind::RealizedPremium => &mut data.realized_premium,
                    SeriesKind::PriorExpense => &mut data.prior_expense,
                };
                series.get_mut(segment).set(month, Some(value));
            }
        }
    }
    if data.version.is_empty() {
        return Err(anyhow!("missing version row"));
    }
    data.ceilings.combined = crate::engine::round2(data.ceilings.non_kur + data.ceilings.kur);
    Ok(data)
}
