// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{DASH, maybe_print_json, pretty_table};
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

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = db::load_profile(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        return Ok(());
    }
    let or_dash = |s: &str| {
        if s.is_empty() {
            DASH.to_string()
        } else {
            s.to_string()
        }
    };
    let rows = vec![
        vec!["Branch".into(), or_dash(&p.branch_name)],
        vec!["Region".into(), or_dash(&p.region)],
        vec!["Current year".into(), p.current_year.to_string()],
        vec!["Prior year".into(), p.prior_year.to_string()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut p = db::load_profile(conn)?;
    if let Some(v) = sub.get_one::<String>("branch") {
        p.branch_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("region") {
        p.region = v.trim().to_string();
    }
    if let Some(y) = sub.get_one::<i32>("year") {
        p.current_year = *y;
        p.prior_year = *y - 1;
    }
    if let Some(y) = sub.get_one::<i32>("prior-year") {
        p.prior_year = *y;
    }
    if p.prior_year >= p.current_year {
        bail!(
            "Prior year {} must be before current year {}",
            p.prior_year,
            p.current_year
        );
    }
    db::save_profile(conn, &p)?;
    println!(
        "Profile set: {} ({}), {} vs {}",
        p.branch_name, p.region, p.current_year, p.prior_year
    );
    Ok(())
}
