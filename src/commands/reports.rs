// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{cumulative_ytd, monthly_yoy, ratio_trend};
use crate::utils::{DASH, fmt_millions, fmt_percent, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("yoy", sub)) => yoy(conn, sub)?,
        Some(("ytd", sub)) => ytd(conn, sub)?,
        Some(("ratio", sub)) => ratio(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn yoy(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let series = db::load_series(conn)?;
    let profile = db::load_profile(conn)?;
    let rows = monthly_yoy(&series.realized_expense, &series.prior_expense);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            if !r.has_data {
                return vec![
                    r.month.name().to_string(),
                    DASH.to_string(),
                    DASH.to_string(),
                    DASH.to_string(),
                    DASH.to_string(),
                ];
            }
            vec![
                r.month.name().to_string(),
                fmt_millions(Some(r.prior)),
                fmt_millions(Some(r.current)),
                fmt_millions(Some(r.difference)),
                fmt_percent(r.growth_pct),
            ]
        })
        .collect();
    let prior_h = profile.prior_year.to_string();
    let current_h = profile.current_year.to_string();
    println!(
        "{}",
        pretty_table(
            &["Month", prior_h.as_str(), current_h.as_str(), "Difference", "Growth"],
            data
        )
    );
    Ok(())
}

fn ytd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let series = db::load_series(conn)?;
    let rows = cumulative_ytd(&series.realized_expense, &series.target_expense);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.month.name().to_string(),
                fmt_millions(Some(r.realized)),
                fmt_millions(Some(r.target)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Realized YTD", "Target YTD"], data)
    );
    Ok(())
}

fn ratio(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let series = db::load_series(conn)?;
    let rows = ratio_trend(&series.realized_expense, &series.realized_premium);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.month.name().to_string(),
                fmt_percent(r.non_kur),
                fmt_percent(r.kur),
                fmt_percent(r.combined),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Non KUR", "KUR", "Combined"], data)
    );
    Ok(())
}
