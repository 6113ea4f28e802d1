// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{Month, Segment, SeriesKind};
use crate::utils::{fmt_amount, maybe_print_json, parse_month, parse_optional_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("clear", sub)) => clear(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn kind_of(sub: &clap::ArgMatches) -> Result<SeriesKind> {
    Ok(sub.get_one::<String>("kind").unwrap().parse()?)
}

fn segment_of(sub: &clap::ArgMatches) -> Result<Segment> {
    Ok(sub.get_one::<String>("segment").unwrap().parse()?)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub)?;
    let series = *db::load_series(conn)?.get(kind);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let combined = series.combined();
    let rows = Month::all()
        .map(|m| {
            vec![
                m.name().to_string(),
                fmt_amount(series.non_kur.get(m)),
                fmt_amount(series.kur.get(m)),
                fmt_amount(combined.get(m)),
            ]
        })
        .collect();
    let title = if kind.is_cumulative() {
        format!("{} (year-to-date)", kind)
    } else {
        format!("{} (per month)", kind)
    };
    println!("{}", title);
    println!(
        "{}",
        pretty_table(&["Month", "Non KUR", "KUR", "Combined"], rows)
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub)?;
    let segment = segment_of(sub)?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let value = parse_optional_amount(sub.get_one::<String>("value").unwrap())?;
    db::set_series_value(conn, kind, segment, month, value)?;
    println!(
        "{} / {} / {} = {}",
        kind,
        segment,
        month.name(),
        fmt_amount(value)
    );
    Ok(())
}

fn clear(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub)?;
    let segment = segment_of(sub)?;
    match sub.get_one::<String>("month") {
        Some(raw) => {
            let month = parse_month(raw)?;
            db::set_series_value(conn, kind, segment, month, None)?;
            println!("Cleared {} / {} / {}", kind, segment, month.name());
        }
        None => {
            let tx = conn.unchecked_transaction()?;
            for month in Month::all() {
                db::set_series_value(&tx, kind, segment, month, None)?;
            }
            tx.commit()?;
            println!("Cleared {} / {} for the whole year", kind, segment);
        }
    }
    Ok(())
}
