// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use branchkpi::commands::{exporter, importer};
use branchkpi::engine::{Ceilings, HalfMonth, Month};
use branchkpi::models::{BudgetState, CeilingVersion, EXPORT_VERSION, ExportData, Profile};
use branchkpi::{cli, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn m(i: i64) -> Month {
    Month::new(i).unwrap()
}

fn sample_state() -> BudgetState {
    let mut state = BudgetState::default();
    state.profile = Profile {
        branch_name: "KC Cirebon, Jabar".into(),
        region: String::new(),
        current_year: 2025,
        prior_year: 2024,
    };
    state.ceilings.initial = Ceilings {
        non_kur: 449.564,
        kur: 700.1,
    };
    let s = &mut state.series;
    s.realized_expense.non_kur.set(m(5), Some(276.0));
    s.realized_expense.non_kur.set(m(8), Some(33.232));
    s.realized_expense.kur.set(m(5), Some(0.0));
    s.realized_premium.non_kur.set(m(5), Some(10352.0));
    s.target_expense.non_kur.set(m(8), Some(334.8));
    s.target_premium.kur.set(m(11), Some(0.1));
    s.prior_expense.kur.set(m(0), Some(-3.5));
    state.projection.month = m(9);
    state.projection.kur = HalfMonth {
        first_half: 0.0,
        second_half: 163.6,
    };
    state
}

fn export_of(state: &BudgetState) -> ExportData {
    ExportData::from_state(state, "2025-10-19T08:00:00+00:00".into())
}

#[test]
fn json_export_round_trips() {
    let data = export_of(&sample_state());
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    exporter::write_json(&path, &data).unwrap();

    let back = importer::read_export(&path).unwrap();
    assert_eq!(back, data);
    assert_eq!(back.version, EXPORT_VERSION);
    assert_eq!(back.ceilings.combined, 1149.66);
    assert_eq!(back.realized_expense.kur.get(m(5)), Some(0.0));
    assert_eq!(back.realized_expense.kur.get(m(6)), None);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["realized_expense"]["non_kur"][5], 276.0);
    assert!(raw["realized_expense"]["non_kur"][4].is_null());
    assert_eq!(raw["projection"]["month"], 9);
}

#[test]
fn csv_export_round_trips() {
    let data = export_of(&sample_state());
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    exporter::write_csv(&path, &data).unwrap();

    let back = importer::read_export(&path).unwrap();
    assert_eq!(back, data);
}

#[test]
fn csv_export_is_long_format_without_absent_slots() {
    let data = export_of(&sample_state());
    let records = exporter::to_records(&data);
    let series_rows: Vec<_> = records
        .iter()
        .filter(|r| r.field == "realized_expense")
        .map(|r| (r.segment.as_str(), r.month.as_str(), r.value.as_str()))
        .collect();
    assert_eq!(
        series_rows,
        vec![
            ("non_kur", "6", "276"),
            ("non_kur", "9", "33.232"),
            ("kur", "6", "0"),
        ]
    );

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    exporter::write_csv(&path, &data).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("field,segment,month,value\n"));
    assert!(text.contains("\"KC Cirebon, Jabar\""));
}

#[test]
fn import_rejects_garbage() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("bad.json");
    std::fs::write(&json, "{\"hello\": 1}").unwrap();
    let err = importer::read_export(&json).unwrap_err();
    assert!(format!("{:#}", err).contains("is not a valid export"));

    let csv = dir.path().join("bad.csv");
    std::fs::write(&csv, "a,b\n1,2\n").unwrap();
    assert!(importer::read_export(&csv).is_err());

    let csv = dir.path().join("bad_value.csv");
    std::fs::write(
        &csv,
        "field,segment,month,value\nversion,,,1.0\nrealized_expense,kur,3,NaN\n",
    )
    .unwrap();
    assert!(importer::read_export(&csv).is_err());

    let txt = dir.path().join("data.txt");
    std::fs::write(&txt, "").unwrap();
    assert!(importer::read_export(&txt).is_err());
}

#[test]
fn import_skips_unknown_csv_fields() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("extra.csv");
    std::fs::write(
        &csv,
        "field,segment,month,value\nversion,,,1.0\nbranch_name,,,Kuningan\nnotes,,,hello\ntarget_expense,kur,2,12.5\n",
    )
    .unwrap();
    let data = importer::read_export(&csv).unwrap();
    assert_eq!(data.profile.branch_name, "Kuningan");
    assert_eq!(data.target_expense.kur.get(m(1)), Some(12.5));
}

#[test]
fn import_writes_ceilings_into_active_version() {
    let mut state = BudgetState::default();
    state.ceilings.initial = Ceilings {
        non_kur: 1.0,
        kur: 2.0,
    };
    state.ceilings.create_revision();
    let data = export_of(&sample_state());
    data.apply_to(&mut state);

    assert_eq!(state.ceilings.active, CeilingVersion::Revised);
    assert_eq!(state.ceilings.initial.non_kur, 1.0);
    assert_eq!(state.ceilings.active().non_kur, 449.564);
    assert_eq!(state.series, sample_state().series);
    assert_eq!(state.projection, sample_state().projection);
}

#[test]
fn export_then_import_via_cli() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::save_state(&mut conn, &sample_state()).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("roundtrip.csv");
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "branchkpi", "export", "--format", "csv", "--out", out_str.as_str(),
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    exporter::handle(&conn, sub).unwrap();

    let mut fresh = Connection::open_in_memory().unwrap();
    db::init_schema(&mut fresh).unwrap();
    let matches =
        cli::build_cli().get_matches_from(["branchkpi", "import", "--path", out_str.as_str()]);
    let (_, sub) = matches.subcommand().unwrap();
    importer::handle(&mut fresh, sub).unwrap();

    assert_eq!(db::load_state(&fresh).unwrap(), sample_state());
}
