// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{ProjectionResult, Segment, project_segments};
use crate::utils::{fmt_millions, fmt_percent, fmt_status, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn projection_row(label: &str, p: &ProjectionResult) -> Vec<String> {
    vec![
        label.to_string(),
        fmt_millions(Some(p.prior_cumulative)),
        fmt_millions(Some(p.first_half_actual)),
        fmt_millions(Some(p.second_half_estimate)),
        fmt_millions(Some(p.projected_total)),
        fmt_millions(Some(p.forward_target)),
        fmt_percent(p.achievement_pct),
        fmt_millions(Some(p.remaining_budget)),
        fmt_status(p.status),
    ]
}

pub(crate) const PROJECTION_HEADERS: [&str; 9] = [
    "Segment",
    "Prior months",
    "1st half",
    "2nd half (est.)",
    "Projected",
    "Target",
    "Achievement",
    "Remaining",
    "Status",
];

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let inputs = db::load_projection(conn)?;
    let series = db::load_series(conn)?;
    let projected = project_segments(&series, &inputs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &projected)? {
        return Ok(());
    }
    println!("Projection month: {}", inputs.month.name());
    match projected {
        Some(p) => {
            let rows = vec![
                projection_row(Segment::NonKur.label(), &p.non_kur),
                projection_row(Segment::Kur.label(), &p.kur),
                projection_row(crate::engine::dashboard::COMBINED_LABEL, &p.combined),
            ];
            println!("{}", pretty_table(&PROJECTION_HEADERS, rows));
        }
        None => println!("No projection for January: there are no prior months to build on"),
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut inputs = db::load_projection(conn)?;
    if let Some(raw) = sub.get_one::<String>("month") {
        inputs.month = parse_month(raw)?;
    }
    let first = sub.get_one::<String>("first");
    let second = sub.get_one::<String>("second");
    match sub.get_one::<String>("segment") {
        Some(seg) => {
            let segment: Segment = seg.parse()?;
            let half = inputs.get_mut(segment);
            if let Some(v) = first {
                half.first_half = parse_amount(v)?;
            }
            if let Some(v) = second {
                half.second_half = parse_amount(v)?;
            }
        }
        None if first.is_some() || second.is_some() => {
            bail!("--first/--second need a --segment");
        }
        None => {}
    }
    db::save_projection(conn, &inputs)?;
    println!("Projection inputs saved for {}", inputs.month.name());
    Ok(())
}
