// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{Month, Status, round2};
use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// Placeholder shown for absent or undefined values.
pub const DASH: &str = "\u{2014}";

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

pub fn parse_month(s: &str) -> Result<Month> {
    s.trim()
        .parse::<Month>()
        .with_context(|| format!("Invalid month '{}', expected 1-12 or a month name", s.trim()))
}

/// Parses a user-entered amount. Only plain decimals are accepted, so NaN
/// and infinities never reach the engine. A comma marks the Indonesian form
/// printed by `fmt_number` (`1.234,5`): dots group thousands and the comma is
/// the decimal separator. Without a comma the dot is the decimal separator.
pub fn parse_amount(s: &str) -> Result<f64> {
    let s = s.trim();
    let normalized = if s.contains(',') {
        s.replace('.', "").replacen(',', ".", 1)
    } else {
        s.to_string()
    };
    normalized
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    // Decimal only validates; f64 parsing gives the nearest double.
    normalized
        .parse::<f64>()
        .map_err(|e| anyhow!("Amount '{}' is out of range: {}", s, e))
}

/// Like `parse_amount`, but an empty string or "-" clears the value.
pub fn parse_optional_amount(s: &str) -> Result<Option<f64>> {
    match s.trim() {
        "" | "-" => Ok(None),
        other => parse_amount(other).map(Some),
    }
}

/// Formats a number the Indonesian way: `.` groups thousands, `,` marks
/// decimals, at most 2 decimals and no trailing zeros. Halves round away
/// from zero.
pub fn fmt_number(v: f64) -> String {
    let fixed = format!("{:.2}", round2(v.abs()));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let negative = v < 0.0 && (int_part != "0" || !frac.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac)
    }
}

pub fn fmt_amount(v: Option<f64>) -> String {
    v.map(fmt_number).unwrap_or_else(|| DASH.to_string())
}

/// Amount in millions of rupiah, e.g. `Rp1.234,5 jt`.
pub fn fmt_millions(v: Option<f64>) -> String {
    v.map(|x| format!("Rp{} jt", fmt_number(x)))
        .unwrap_or_else(|| DASH.to_string())
}

pub fn fmt_percent(v: Option<f64>) -> String {
    v.map(|x| format!("{}%", fmt_number(x)))
        .unwrap_or_else(|| DASH.to_string())
}

pub fn fmt_status(s: Status) -> String {
    match s {
        Status::Safe => "SAFE".to_string(),
        Status::Caution => "CAUTION".to_string(),
        Status::Danger => "DANGER".to_string(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// `marketing_expense_<branch>_<year>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(branch_name: &str, year: i32, date: chrono::NaiveDate, ext: &str) -> String {
    let branch = NON_ALNUM.replace_all(branch_name, "_");
    let branch = if branch.is_empty() { "branch".into() } else { branch };
    format!(
        "marketing_expense_{}_{}_{}.{}",
        branch,
        year,
        date.format("%Y-%m-%d"),
        ext
    )
}
