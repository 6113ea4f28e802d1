// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{Ceilings, Segment};
use crate::models::CeilingVersion;
use crate::utils::{fmt_millions, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, anyhow, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("revise", _)) => {
            let mut c = db::load_ceilings(conn)?;
            if c.revised.is_some() {
                log::warn!("replacing the existing ceiling revision");
            }
            c.create_revision();
            db::save_ceilings(conn, &c)?;
            println!("Created a revision from the initial ceilings; it is now active");
        }
        Some(("drop-revision", _)) => {
            let mut c = db::load_ceilings(conn)?;
            if c.revised.is_none() {
                println!("No revision to drop");
                return Ok(());
            }
            c.drop_revision();
            db::save_ceilings(conn, &c)?;
            println!("Dropped the revision; initial ceilings are active");
        }
        Some(("activate", sub)) => {
            let version: CeilingVersion = sub.get_one::<String>("version").unwrap().parse()?;
            let mut c = db::load_ceilings(conn)?;
            if version == CeilingVersion::Revised && c.revised.is_none() {
                bail!("No revision exists, run `ceiling revise` first");
            }
            c.active = version;
            db::save_ceilings(conn, &c)?;
            println!("Active ceilings: {}", version);
        }
        _ => {}
    }
    Ok(())
}

fn row(name: &str, c: &Ceilings, active: bool) -> Vec<String> {
    vec![
        format!("{}{}", name, if active { " *" } else { "" }),
        fmt_millions(Some(c.non_kur)),
        fmt_millions(Some(c.kur)),
        fmt_millions(Some(c.combined())),
    ]
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let c = db::load_ceilings(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &c)? {
        return Ok(());
    }
    let mut rows = vec![row(
        CeilingVersion::Initial.as_str(),
        &c.initial,
        c.active == CeilingVersion::Initial || c.revised.is_none(),
    )];
    if let Some(r) = &c.revised {
        rows.push(row(
            CeilingVersion::Revised.as_str(),
            r,
            c.active == CeilingVersion::Revised,
        ));
    }
    println!(
        "{}",
        pretty_table(&["Version", "Non KUR", "KUR", "Combined"], rows)
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let segment: Segment = sub.get_one::<String>("segment").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    if amount < 0.0 {
        bail!("Ceiling cannot be negative");
    }
    let mut c = db::load_ceilings(conn)?;
    let version = match sub.get_one::<String>("version") {
        Some(v) => v.parse()?,
        None => c.active,
    };
    c.version_mut(version)
        .ok_or_else(|| anyhow!("No revision exists, run `ceiling revise` first"))?
        .set(segment, amount);
    db::save_ceilings(conn, &c)?;
    println!(
        "Ceiling ({}) for {} set to {}",
        version,
        segment,
        fmt_millions(Some(amount))
    );
    Ok(())
}
