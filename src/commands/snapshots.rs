// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{maybe_print_json, now_rfc3339, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => {
            let label = sub.get_one::<String>("label").map(|s| s.as_str());
            let id = save_new(conn, label)?;
            println!("Saved snapshot {}", id);
        }
        Some(("update", _)) => {
            if update_active(conn)? {
                println!("Active snapshot updated");
            } else {
                println!("No active snapshot, use `snapshot save` first");
            }
        }
        Some(("list", sub)) => {
            let items = db::list_snapshots(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.label,
                            s.created_at,
                            s.updated_at,
                            if s.active { "*".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Label", "Created", "Updated", "Active"], rows)
                );
            }
        }
        Some(("load", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            load(conn, id)?;
            println!("Loaded snapshot {}", id);
        }
        Some(("rename", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let label = sub.get_one::<String>("label").unwrap().trim();
            if !db::rename_snapshot(conn, id, label)? {
                bail!("Snapshot {} not found", id);
            }
            println!("Renamed snapshot {} to '{}'", id, label);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if !db::delete_snapshot(conn, id)? {
                bail!("Snapshot {} not found", id);
            }
            println!("Removed snapshot {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Stores the current inputs as a new snapshot and makes it active. The
/// previously active snapshot is refreshed first.
pub fn save_new(conn: &Connection, label: Option<&str>) -> Result<i64> {
    update_active(conn)?;
    let state = db::load_state(conn)?;
    let label = match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(l) => l.to_string(),
        None if !state.profile.branch_name.is_empty() => state.profile.branch_name.clone(),
        None => format!("Profile {}", db::list_snapshots(conn)?.len() + 1),
    };
    let id = db::insert_snapshot(conn, &label, &state, &now_rfc3339())?;
    db::set_active_snapshot(conn, Some(id))?;
    log::info!("saved snapshot {} '{}'", id, label);
    Ok(id)
}

/// Writes the current inputs into the active snapshot. False when there is
/// none.
pub fn update_active(conn: &Connection) -> Result<bool> {
    let Some(id) = db::active_snapshot(conn)? else {
        return Ok(false);
    };
    let state = db::load_state(conn)?;
    let found = db::update_snapshot(conn, id, &state, &now_rfc3339())?;
    if !found {
        log::warn!("active snapshot {} no longer exists", id);
        db::set_active_snapshot(conn, None)?;
    }
    Ok(found)
}

/// Replaces the current inputs with snapshot `id`, saving the active one
/// first when switching.
pub fn load(conn: &mut Connection, id: i64) -> Result<()> {
    let state = db::snapshot_state(conn, id)?;
    if db::active_snapshot(conn)?.is_some_and(|active| active != id) {
        update_active(conn)?;
    }
    db::save_state(conn, &state)?;
    db::set_active_snapshot(conn, Some(id))?;
    log::info!("loaded snapshot {}", id);
    Ok(())
}
