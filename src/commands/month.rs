// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::parse_month;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let month = db::active_month(conn)?;
            println!("Active month: {} ({})", month.name(), month.index() + 1);
        }
        Some(("set", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            db::set_active_month(conn, month)?;
            println!("Active month set to {}", month.name());
        }
        _ => {}
    }
    Ok(())
}
