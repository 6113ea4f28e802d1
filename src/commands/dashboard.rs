// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::projection::{PROJECTION_HEADERS, projection_row};
use crate::db;
use crate::engine::dashboard::COMBINED_LABEL;
use crate::engine::{Dashboard, KpiSet, Segment, compute_dashboard};
use crate::utils::{fmt_millions, fmt_percent, fmt_status, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(raw) => parse_month(raw)?,
        None => db::active_month(conn)?,
    };
    let state = db::load_state(conn)?;
    let dash = compute_dashboard(
        &state.series,
        &state.ceilings.active(),
        &state.projection,
        month,
    );
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    let branch = if state.profile.branch_name.is_empty() {
        "Branch".to_string()
    } else {
        state.profile.branch_name.clone()
    };
    println!(
        "{}: January-{} {} (ceilings: {})",
        branch,
        month.name(),
        state.profile.current_year,
        state.ceilings.active
    );
    print_dashboard(&dash);
    Ok(())
}

pub fn kpi_tables(kpis: &KpiSet) -> [comfy_table::Table; 3] {
    let labelled = kpis.labelled();
    let nominal = labelled
        .iter()
        .map(|(label, k)| {
            let n = &k.nominal;
            vec![
                label.to_string(),
                fmt_millions(Some(n.realized_to_date)),
                fmt_millions(Some(n.target_to_date)),
                fmt_percent(n.achievement_pct),
                fmt_percent(n.ceiling_pct),
                fmt_millions(Some(n.remaining_budget)),
                fmt_status(n.status),
            ]
        })
        .collect();
    let ratio = labelled
        .iter()
        .map(|(label, k)| {
            let r = &k.ratio;
            vec![
                label.to_string(),
                fmt_percent(r.realized_ratio),
                fmt_percent(r.target_ratio),
                fmt_percent(r.achievement_pct),
                fmt_status(r.status),
            ]
        })
        .collect();
    let yoy = labelled
        .iter()
        .map(|(label, k)| {
            let y = &k.yoy;
            vec![
                label.to_string(),
                fmt_millions(Some(y.current_to_date)),
                fmt_millions(Some(y.prior_to_date)),
                fmt_percent(y.growth_pct),
                fmt_status(y.status),
            ]
        })
        .collect();
    [
        pretty_table(
            &[
                "Segment",
                "Realized YTD",
                "Target YTD",
                "Achievement",
                "Of ceiling",
                "Remaining",
                "Status",
            ],
            nominal,
        ),
        pretty_table(
            &["Segment", "Realized ratio", "Target ratio", "Achievement", "Status"],
            ratio,
        ),
        pretty_table(
            &["Segment", "This year YTD", "Last year YTD", "Growth", "Status"],
            yoy,
        ),
    ]
}

fn print_dashboard(dash: &Dashboard) {
    let [nominal, ratio, yoy] = kpi_tables(&dash.kpis);
    println!("Nominal");
    println!("{}", nominal);
    println!("Expense ratio");
    println!("{}", ratio);
    println!("Year over year");
    println!("{}", yoy);

    if let Some(p) = &dash.projection {
        println!("Projection for {}", p.month.name());
        let rows = vec![
            projection_row(Segment::NonKur.label(), &p.non_kur),
            projection_row(Segment::Kur.label(), &p.kur),
            projection_row(COMBINED_LABEL, &p.combined),
        ];
        println!("{}", pretty_table(&PROJECTION_HEADERS, rows));
    }

    if dash.warnings.is_empty() {
        println!("No warnings");
    } else {
        let rows = dash
            .warnings
            .iter()
            .map(|w| {
                vec![
                    fmt_status(w.severity),
                    w.parameter.to_string(),
                    w.message.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Severity", "Parameter", "Message"], rows)
        );
    }

    if let Some(m) = dash.breach_month {
        println!(
            "At the current pace, combined spend overruns its target in {}",
            m.name()
        );
    }
}
