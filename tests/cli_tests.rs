// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use branchkpi::commands::{ceilings, doctor, reports, reset, series};
use branchkpi::engine::{Ceilings, Month, Status};
use branchkpi::models::{BudgetState, CeilingVersion};
use branchkpi::utils::{
    DASH, export_filename, fmt_number, fmt_percent, fmt_status, parse_amount, parse_month,
    parse_optional_amount,
};
use branchkpi::{cli, db};
use chrono::NaiveDate;
use rusqlite::Connection;

fn m(i: i64) -> Month {
    Month::new(i).unwrap()
}

fn fresh_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_series(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["branchkpi", "series"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, sub) = matches.subcommand().unwrap();
    series::handle(conn, sub)
}

fn run_ceiling(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["branchkpi", "ceiling"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, sub) = matches.subcommand().unwrap();
    ceilings::handle(conn, sub)
}

#[test]
fn numbers_use_indonesian_grouping() {
    assert_eq!(fmt_number(1234.5), "1.234,5");
    assert_eq!(fmt_number(-77.43), "-77,43");
    assert_eq!(fmt_number(1234567.0), "1.234.567");
    assert_eq!(fmt_number(0.0), "0");
    assert_eq!(fmt_number(-0.001), "0");
    assert_eq!(fmt_percent(Some(123.08)), "123,08%");
    assert_eq!(fmt_percent(None), DASH);
    assert_eq!(fmt_status(Status::Caution), "CAUTION");
}

#[test]
fn number_formatting_rounds_halves_away_from_zero() {
    assert_eq!(fmt_number(0.125), "0,13");
    assert_eq!(fmt_number(-0.125), "-0,13");
    assert_eq!(fmt_number(2.5), "2,5");
    assert_eq!(fmt_percent(Some(87.125)), "87,13%");
}

#[test]
fn export_filename_sanitizes_branch() {
    let date = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
    assert_eq!(
        export_filename("KC Cirebon", 2025, date, "json"),
        "marketing_expense_KC_Cirebon_2025_2025-10-19.json"
    );
    assert_eq!(
        export_filename("", 2024, date, "csv"),
        "marketing_expense_branch_2024_2025-10-19.csv"
    );
}

#[test]
fn amount_and_month_parsing() {
    assert_eq!(parse_amount(" 33.232 ").unwrap(), 33.232);
    assert_eq!(parse_amount("-5").unwrap(), -5.0);
    assert!(parse_amount("abc").is_err());
    assert!(parse_amount("NaN").is_err());
    assert!(parse_amount("inf").is_err());
    assert_eq!(parse_optional_amount("").unwrap(), None);
    assert_eq!(parse_optional_amount("-").unwrap(), None);
    assert_eq!(parse_optional_amount("0").unwrap(), Some(0.0));

    // Indonesian form, as printed by fmt_number
    assert_eq!(parse_amount("1.234,5").unwrap(), 1234.5);
    assert_eq!(parse_amount("-77,43").unwrap(), -77.43);
    assert_eq!(parse_amount("1.234.567").unwrap_err().to_string(), "Invalid amount '1.234.567'");
    assert!(parse_amount("1,2,3").is_err());
    assert_eq!(parse_amount(&fmt_number(449.56)).unwrap(), 449.56);
    assert_eq!(parse_optional_amount("12,5").unwrap(), Some(12.5));

    assert_eq!(parse_month("sep").unwrap(), m(8));
    assert_eq!(parse_month("September").unwrap(), m(8));
    assert_eq!(parse_month("1").unwrap(), Month::JANUARY);
    assert_eq!(parse_month("12").unwrap(), Month::DECEMBER);
    assert!(parse_month("0").is_err());
    assert!(parse_month("13").is_err());
    assert!(parse_month("ju").is_err());
}

#[test]
fn series_set_and_clear_through_cli() {
    let conn = fresh_conn();
    run_series(
        &conn,
        &["set", "--kind", "realized_expense", "--segment", "non-kur", "--month", "jun", "--value", "276"],
    )
    .unwrap();
    run_series(
        &conn,
        &["set", "--kind", "realized-expense", "--segment", "kur", "--month", "6", "--value", "0"],
    )
    .unwrap();
    run_series(
        &conn,
        &["set", "--kind", "realized_expense", "--segment", "kur", "--month", "7", "--value", "12.5"],
    )
    .unwrap();

    let s = db::load_series(&conn).unwrap();
    assert_eq!(s.realized_expense.non_kur.get(m(5)), Some(276.0));
    assert_eq!(s.realized_expense.kur.get(m(5)), Some(0.0));
    assert_eq!(s.realized_expense.kur.get(m(6)), Some(12.5));

    run_series(
        &conn,
        &["set", "--kind", "realized_expense", "--segment", "kur", "--month", "6", "--value", "-"],
    )
    .unwrap();
    assert_eq!(db::load_series(&conn).unwrap().realized_expense.kur.get(m(5)), None);

    run_series(&conn, &["clear", "--kind", "realized_expense", "--segment", "kur"]).unwrap();
    let s = db::load_series(&conn).unwrap();
    assert!(s.realized_expense.kur.is_empty());
    assert_eq!(s.realized_expense.non_kur.get(m(5)), Some(276.0));

    assert!(
        run_series(
            &conn,
            &["set", "--kind", "budget", "--segment", "kur", "--month", "1", "--value", "1"],
        )
        .is_err()
    );
    assert!(
        run_series(
            &conn,
            &["set", "--kind", "prior_expense", "--segment", "kur", "--month", "1", "--value", "x"],
        )
        .is_err()
    );
}

#[test]
fn ceiling_revision_through_cli() {
    let conn = fresh_conn();
    run_ceiling(&conn, &["set", "--segment", "non-kur", "--amount", "449.564"]).unwrap();
    run_ceiling(&conn, &["set", "--segment", "kur", "--amount", "700"]).unwrap();

    let err = run_ceiling(
        &conn,
        &["set", "--segment", "kur", "--amount", "650", "--version", "revised"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("No revision exists"));
    assert!(run_ceiling(&conn, &["activate", "--version", "revised"]).is_err());

    run_ceiling(&conn, &["revise"]).unwrap();
    run_ceiling(&conn, &["set", "--segment", "kur", "--amount", "650"]).unwrap();
    let c = db::load_ceilings(&conn).unwrap();
    assert_eq!(c.active, CeilingVersion::Revised);
    assert_eq!(c.active(), Ceilings { non_kur: 449.564, kur: 650.0 });
    assert_eq!(c.initial.kur, 700.0);

    run_ceiling(&conn, &["activate", "--version", "initial"]).unwrap();
    assert_eq!(db::load_ceilings(&conn).unwrap().active().kur, 700.0);

    run_ceiling(&conn, &["drop-revision"]).unwrap();
    assert_eq!(db::load_ceilings(&conn).unwrap().revised, None);
}

fn issues(state: &BudgetState) -> Vec<String> {
    doctor::find_issues(state)
        .into_iter()
        .map(|row| row[0].clone())
        .collect()
}

#[test]
fn doctor_is_quiet_on_clean_state() {
    let mut state = BudgetState::default();
    state.ceilings.initial = Ceilings {
        non_kur: 449.564,
        kur: 700.0,
    };
    state.series.target_expense.non_kur.set(m(0), Some(30.0));
    state.series.target_expense.non_kur.set(m(1), Some(60.0));
    state.series.realized_expense.non_kur.set(m(0), Some(25.0));
    assert!(doctor::find_issues(&state).is_empty());
}

#[test]
fn doctor_flags_inconsistent_inputs() {
    let mut state = BudgetState::default();
    state.series.target_expense.kur.set(m(0), Some(60.0));
    state.series.target_expense.kur.set(m(1), Some(40.0));
    state.series.prior_expense.non_kur.set(m(2), Some(-1.0));
    state.series.realized_expense.non_kur.set(m(3), Some(5.0));

    assert_eq!(
        issues(&state),
        vec![
            "target_not_cumulative",
            "negative_value",
            "realized_without_target",
            "missing_ceiling",
        ]
    );
    let rows = doctor::find_issues(&state);
    assert_eq!(rows[0][1], "target_expense kur February: 40 is below 60 (January)");
    assert_eq!(rows[2][1], "non_kur April");
}

#[test]
fn reset_requires_confirmation() {
    let mut conn = fresh_conn();
    run_series(
        &conn,
        &["set", "--kind", "target_expense", "--segment", "kur", "--month", "1", "--value", "5"],
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from(["branchkpi", "reset"]);
    let (_, sub) = matches.subcommand().unwrap();
    let err = reset::handle(&mut conn, sub).unwrap_err();
    assert!(err.to_string().contains("--yes"));
    assert_eq!(db::load_series(&conn).unwrap().target_expense.kur.get(m(0)), Some(5.0));

    let matches = cli::build_cli().get_matches_from(["branchkpi", "reset", "--yes"]);
    let (_, sub) = matches.subcommand().unwrap();
    reset::handle(&mut conn, sub).unwrap();
    assert!(db::load_series(&conn).unwrap().target_expense.kur.is_empty());
}

#[test]
fn trend_reports_run_on_empty_and_filled_state() {
    let conn = fresh_conn();
    for args in [["report", "ytd"], ["report", "ratio"]] {
        let matches = cli::build_cli().get_matches_from(["branchkpi", args[0], args[1], "--json"]);
        let (_, sub) = matches.subcommand().unwrap();
        reports::handle(&conn, sub).unwrap();
    }

    run_series(
        &conn,
        &["set", "--kind", "realized_expense", "--segment", "non-kur", "--month", "1", "--value", "10"],
    )
    .unwrap();
    run_series(
        &conn,
        &["set", "--kind", "realized_premium", "--segment", "non-kur", "--month", "1", "--value", "1000"],
    )
    .unwrap();
    for args in [["report", "ytd"], ["report", "ratio"]] {
        let matches = cli::build_cli().get_matches_from(["branchkpi", args[0], args[1]]);
        let (_, sub) = matches.subcommand().unwrap();
        reports::handle(&conn, sub).unwrap();
    }
}
