// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{Ceilings, HalfMonth, Month, ProjectionInputs, Segment, SeriesKind, SeriesSet};
use crate::models::{
    BudgetState, CeilingRevisions, CeilingVersion, Profile, SnapshotInfo, current_month,
    default_active_month,
};
use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Branchkpi", "branchkpi"));

pub const DB_ENV: &str = "BRANCHKPI_DB";
pub const SCHEMA_VERSION: i32 = 2;

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("branchkpi.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
}

/// Brings the schema up to `SCHEMA_VERSION`, one step at a time.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    let mut version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        bail!(
            "Database schema v{} is newer than this build supports (v{})",
            version,
            SCHEMA_VERSION
        );
    }
    if version < 1 {
        migrate_v1(conn)?;
        version = 1;
    }
    if version < 2 {
        migrate_v2(conn)?;
        log::info!("migrated schema to v2 (revisable ceilings)");
    }
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- one row per entered slot; an absent month has no row
    CREATE TABLE IF NOT EXISTS series_values(
        kind TEXT NOT NULL,
        segment TEXT NOT NULL CHECK(segment IN ('non_kur','kur')),
        month INTEGER NOT NULL CHECK(month BETWEEN 0 AND 11),
        value TEXT NOT NULL,
        PRIMARY KEY(kind, segment, month)
    );

    CREATE TABLE IF NOT EXISTS projection_inputs(
        segment TEXT PRIMARY KEY CHECK(segment IN ('non_kur','kur')),
        first_half TEXT NOT NULL DEFAULT '0',
        second_half TEXT NOT NULL DEFAULT '0'
    );

    CREATE TABLE IF NOT EXISTS annual_ceiling(
        segment TEXT PRIMARY KEY,
        amount TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS snapshots(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        payload TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

fn migrate_v2(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS ceilings(
        version TEXT PRIMARY KEY CHECK(version IN ('initial','revised')),
        non_kur TEXT NOT NULL DEFAULT '0',
        kur TEXT NOT NULL DEFAULT '0'
    );

    INSERT OR IGNORE INTO ceilings(version, non_kur, kur)
    SELECT 'initial',
        COALESCE((SELECT amount FROM annual_ceiling WHERE segment='non_kur'), '0'),
        COALESCE((SELECT amount FROM annual_ceiling WHERE segment='kur'), '0');

    DROP TABLE IF EXISTS annual_ceiling;
    "#,
    )?;
    tx.commit()?;
    Ok(())
}

fn amount_text(v: f64) -> String {
    v.to_string()
}

fn parse_amount_text(s: &str, what: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("Invalid stored amount '{}' for {}", s, what))
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

fn month_setting(conn: &Connection, key: &str) -> Result<Option<Month>> {
    match get_setting(conn, key)? {
        Some(s) => {
            let idx: i64 = s
                .parse()
                .with_context(|| format!("Invalid month '{}' in setting {}", s, key))?;
            Ok(Some(Month::new(idx)?))
        }
        None => Ok(None),
    }
}

pub fn active_month(conn: &Connection) -> Result<Month> {
    Ok(month_setting(conn, "active_month")?.unwrap_or_else(default_active_month))
}

pub fn set_active_month(conn: &Connection, month: Month) -> Result<()> {
    set_setting(conn, "active_month", &month.index().to_string())
}

// Profile

pub fn load_profile(conn: &Connection) -> Result<Profile> {
    let mut p = Profile::default();
    if let Some(v) = get_setting(conn, "branch_name")? {
        p.branch_name = v;
    }
    if let Some(v) = get_setting(conn, "region")? {
        p.region = v;
    }
    if let Some(v) = get_setting(conn, "current_year")? {
        p.current_year = v
            .parse()
            .with_context(|| format!("Invalid current_year '{}'", v))?;
    }
    if let Some(v) = get_setting(conn, "prior_year")? {
        p.prior_year = v
            .parse()
            .with_context(|| format!("Invalid prior_year '{}'", v))?;
    }
    Ok(p)
}

pub fn save_profile(conn: &Connection, p: &Profile) -> Result<()> {
    set_setting(conn, "branch_name", &p.branch_name)?;
    set_setting(conn, "region", &p.region)?;
    set_setting(conn, "current_year", &p.current_year.to_string())?;
    set_setting(conn, "prior_year", &p.prior_year.to_string())?;
    Ok(())
}

// Ceilings

pub fn load_ceilings(conn: &Connection) -> Result<CeilingRevisions> {
    let mut out = CeilingRevisions::default();
    let mut stmt = conn.prepare("SELECT version, non_kur, kur FROM ceilings")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    for row in rows {
        let (version, nk, k) = row?;
        let c = Ceilings {
            non_kur: parse_amount_text(&nk, "non_kur ceiling")?,
            kur: parse_amount_text(&k, "kur ceiling")?,
        };
        match version.parse::<CeilingVersion>()? {
            CeilingVersion::Initial => out.initial = c,
            CeilingVersion::Revised => out.revised = Some(c),
        }
    }
    if let Some(v) = get_setting(conn, "active_ceiling")? {
        out.active = v.parse()?;
    }
    Ok(out)
}

pub fn save_ceilings(conn: &Connection, c: &CeilingRevisions) -> Result<()> {
    let upsert = "INSERT INTO ceilings(version, non_kur, kur) VALUES (?1,?2,?3)
         ON CONFLICT(version) DO UPDATE SET non_kur=excluded.non_kur, kur=excluded.kur";
    conn.execute(
        upsert,
        params![
            CeilingVersion::Initial.as_str(),
            amount_text(c.initial.non_kur),
            amount_text(c.initial.kur)
        ],
    )?;
    match c.revised {
        Some(r) => {
            conn.execute(
                upsert,
                params![
                    CeilingVersion::Revised.as_str(),
                    amount_text(r.non_kur),
                    amount_text(r.kur)
                ],
            )?;
        }
        None => {
            conn.execute("DELETE FROM ceilings WHERE version='revised'", [])?;
        }
    }
    set_setting(conn, "active_ceiling", c.active.as_str())?;
    Ok(())
}

// Series

pub fn load_series(conn: &Connection) -> Result<SeriesSet> {
    let mut out = SeriesSet::default();
    let mut stmt = conn.prepare("SELECT kind, segment, month, value FROM series_values")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    for row in rows {
        let (kind_s, seg_s, month_i, value_s) = row?;
        let Ok(kind) = kind_s.parse::<SeriesKind>() else {
            log::warn!("skipping stored value of unknown series kind '{}'", kind_s);
            continue;
        };
        let segment: Segment = seg_s.parse()?;
        let month = Month::new(month_i)?;
        let value = parse_amount_text(&value_s, kind.as_str())?;
        out.get_mut(kind).get_mut(segment).set(month, Some(value));
    }
    Ok(out)
}

/// Stores or clears (`None`) a single month slot.
pub fn set_series_value(
    conn: &Connection,
    kind: SeriesKind,
    segment: Segment,
    month: Month,
    value: Option<f64>,
) -> Result<()> {
    match value {
        Some(v) => {
            conn.execute(
                "INSERT INTO series_values(kind, segment, month, value) VALUES (?1,?2,?3,?4)
                 ON CONFLICT(kind, segment, month) DO UPDATE SET value=excluded.value",
                params![
                    kind.as_str(),
                    segment.as_str(),
                    month.index() as i64,
                    amount_text(v)
                ],
            )?;
        }
        None => {
            conn.execute(
                "DELETE FROM series_values WHERE kind=?1 AND segment=?2 AND month=?3",
                params![kind.as_str(), segment.as_str(), month.index() as i64],
            )?;
        }
    }
    Ok(())
}

fn save_series(conn: &Connection, series: &SeriesSet) -> Result<()> {
    conn.execute("DELETE FROM series_values", [])?;
    for kind in SeriesKind::ALL {
        for segment in Segment::ALL {
            for (month, value) in series.get(kind).get(segment).iter() {
                if value.is_some() {
                    set_series_value(conn, kind, segment, month, value)?;
                }
            }
        }
    }
    Ok(())
}

// Projection

pub fn load_projection(conn: &Connection) -> Result<ProjectionInputs> {
    let month = month_setting(conn, "projection_month")?.unwrap_or_else(current_month);
    let mut out = ProjectionInputs::new(month);
    let mut stmt = conn.prepare("SELECT segment, first_half, second_half FROM projection_inputs")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    for row in rows {
        let (seg_s, first, second) = row?;
        let segment: Segment = seg_s.parse()?;
        *out.get_mut(segment) = HalfMonth {
            first_half: parse_amount_text(&first, "first_half")?,
            second_half: parse_amount_text(&second, "second_half")?,
        };
    }
    Ok(out)
}

pub fn save_projection(conn: &Connection, p: &ProjectionInputs) -> Result<()> {
    set_setting(conn, "projection_month", &p.month.index().to_string())?;
    for segment in Segment::ALL {
        let h = p.get(segment);
        conn.execute(
            "INSERT INTO projection_inputs(segment, first_half, second_half) VALUES (?1,?2,?3)
             ON CONFLICT(segment) DO UPDATE SET first_half=excluded.first_half, second_half=excluded.second_half",
            params![
                segment.as_str(),
                amount_text(h.first_half),
                amount_text(h.second_half)
            ],
        )?;
    }
    Ok(())
}

// Whole state

pub fn load_state(conn: &Connection) -> Result<BudgetState> {
    Ok(BudgetState {
        profile: load_profile(conn)?,
        ceilings: load_ceilings(conn)?,
        series: load_series(conn)?,
        projection: load_projection(conn)?,
    })
}

/// Replaces every stored input with `state`, atomically.
pub fn save_state(conn: &mut Connection, state: &BudgetState) -> Result<()> {
    let tx = conn.transaction()?;
    save_profile(&tx, &state.profile)?;
    save_ceilings(&tx, &state.ceilings)?;
    save_series(&tx, &state.series)?;
    save_projection(&tx, &state.projection)?;
    tx.commit()?;
    Ok(())
}

/// Clears profile, ceilings, series and projection inputs back to their
/// defaults in one transaction. Snapshots are kept but none stays active,
/// so the cleared inputs are never written over a saved snapshot.
pub fn reset_state(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let fresh = BudgetState::default();
    for key in ["branch_name", "region", "current_year", "prior_year"] {
        clear_setting(&tx, key)?;
    }
    save_ceilings(&tx, &fresh.ceilings)?;
    save_series(&tx, &fresh.series)?;
    tx.execute("DELETE FROM projection_inputs", [])?;
    clear_setting(&tx, "projection_month")?;
    clear_setting(&tx, "active_snapshot")?;
    tx.commit()?;
    log::info!("reset all inputs");
    Ok(())
}

// Snapshots

pub fn active_snapshot(conn: &Connection) -> Result<Option<i64>> {
    match get_setting(conn, "active_snapshot")? {
        Some(s) => Ok(Some(
            s.parse()
                .with_context(|| format!("Invalid active_snapshot '{}'", s))?,
        )),
        None => Ok(None),
    }
}

pub fn set_active_snapshot(conn: &Connection, id: Option<i64>) -> Result<()> {
    match id {
        Some(id) => set_setting(conn, "active_snapshot", &id.to_string()),
        None => clear_setting(conn, "active_snapshot"),
    }
}

pub fn insert_snapshot(conn: &Connection, label: &str, state: &BudgetState, now: &str) -> Result<i64> {
    let payload = serde_json::to_string(state)?;
    conn.execute(
        "INSERT INTO snapshots(label, created_at, updated_at, payload) VALUES (?1,?2,?2,?3)",
        params![label, now, payload],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites a snapshot's payload; false when the id does not exist.
pub fn update_snapshot(conn: &Connection, id: i64, state: &BudgetState, now: &str) -> Result<bool> {
    let payload = serde_json::to_string(state)?;
    let n = conn.execute(
        "UPDATE snapshots SET payload=?1, updated_at=?2 WHERE id=?3",
        params![payload, now, id],
    )?;
    Ok(n > 0)
}

pub fn snapshot_state(conn: &Connection, id: i64) -> Result<BudgetState> {
    let payload: String = conn
        .query_row(
            "SELECT payload FROM snapshots WHERE id=?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or_else(|| anyhow!("Snapshot {} not found", id))?;
    serde_json::from_str(&payload).with_context(|| format!("Corrupt payload in snapshot {}", id))
}

pub fn list_snapshots(conn: &Connection) -> Result<Vec<SnapshotInfo>> {
    let active = active_snapshot(conn)?;
    let mut stmt =
        conn.prepare("SELECT id, label, created_at, updated_at FROM snapshots ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, label, created_at, updated_at) = row?;
        out.push(SnapshotInfo {
            id,
            label,
            created_at,
            updated_at,
            active: active == Some(id),
        });
    }
    Ok(out)
}

pub fn rename_snapshot(conn: &Connection, id: i64, label: &str) -> Result<bool> {
    let n = conn.execute(
        "UPDATE snapshots SET label=?1 WHERE id=?2",
        params![label, id],
    )?;
    Ok(n > 0)
}

pub fn delete_snapshot(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM snapshots WHERE id=?1", params![id])?;
    if active_snapshot(conn)? == Some(id) {
        set_active_snapshot(conn, None)?;
    }
    Ok(n > 0)
}
