// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("This clears every input and cannot be undone; pass --yes to confirm");
    }
    db::reset_state(conn)?;
    println!("All inputs cleared; saved snapshots are kept");
    Ok(())
}
