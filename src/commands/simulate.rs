// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{Overrides, Segment, SegmentKpis, SegmentOverride, SeriesKind, simulate};
use crate::utils::{fmt_millions, fmt_percent, fmt_status, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

fn amount_arg(sub: &clap::ArgMatches, name: &str) -> Result<Option<f64>> {
    sub.get_one::<String>(name)
        .map(|s| parse_amount(s))
        .transpose()
}

fn summary(k: &SegmentKpis) -> [String; 3] {
    [
        format!(
            "{} {}",
            fmt_percent(k.nominal.achievement_pct),
            fmt_status(k.nominal.status)
        ),
        format!(
            "{} {}",
            fmt_percent(k.ratio.achievement_pct),
            fmt_status(k.ratio.status)
        ),
        format!("{} {}", fmt_percent(k.yoy.growth_pct), fmt_status(k.yoy.status)),
    ]
}

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(raw) => parse_month(raw)?,
        None => db::active_month(conn)?,
    };
    let overrides = Overrides {
        month,
        expense: SegmentOverride {
            non_kur: amount_arg(sub, "expense-non-kur")?,
            kur: amount_arg(sub, "expense-kur")?,
        },
        premium: SegmentOverride {
            non_kur: amount_arg(sub, "premium-non-kur")?,
            kur: amount_arg(sub, "premium-kur")?,
        },
    };
    if overrides.is_empty() {
        bail!("Nothing to simulate: pass at least one --expense-*/--premium-* value");
    }

    let state = db::load_state(conn)?;
    let outcome = simulate(&state.series, &state.ceilings.active(), &overrides);

    if sub.get_flag("apply") {
        let tx = conn.transaction()?;
        for segment in Segment::ALL {
            if let Some(v) = overrides.expense.get(segment) {
                db::set_series_value(&tx, SeriesKind::RealizedExpense, segment, month, Some(v))?;
            }
            if let Some(v) = overrides.premium.get(segment) {
                db::set_series_value(&tx, SeriesKind::RealizedPremium, segment, month, Some(v))?;
            }
        }
        tx.commit()?;
        log::info!("applied simulated figures for {}", month);
    }

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome)? {
        return Ok(());
    }
    let baseline = outcome.baseline.labelled();
    let simulated = outcome.simulated.labelled();
    let rows = baseline
        .iter()
        .zip(simulated.iter())
        .flat_map(|((label, before), (_, after))| {
            let [bn, br, by] = summary(before);
            let [an, ar, ay] = summary(after);
            [
                vec![label.to_string(), "Nominal".into(), bn, an],
                vec![label.to_string(), "Ratio".into(), br, ar],
                vec![label.to_string(), "YoY".into(), by, ay],
            ]
        })
        .collect();
    println!("What-if for {}", month.name());
    println!(
        "{}",
        pretty_table(&["Segment", "Parameter", "Current", "Simulated"], rows)
    );
    println!(
        "Minimum combined premium for the target ratio: {}",
        fmt_millions(outcome.minimum_premium)
    );
    if sub.get_flag("apply") {
        println!("Simulated figures stored as realized values");
    }
    Ok(())
}
