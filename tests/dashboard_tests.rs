// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use branchkpi::engine::{
    Ceilings, HalfMonth, Month, MonthlySeries, Overrides, Parameter, ProjectionInputs,
    SegmentOverride, SeriesSet, Status, apply_overrides, collect_warnings, compute_dashboard,
    compute_kpis, compute_nominal, compute_ratio, compute_yoy, cumulative_ytd,
    forecast_breach_month, minimum_premium, monthly_yoy, ratio_trend, simulate,
};

fn m(i: i64) -> Month {
    Month::new(i).unwrap()
}

fn at(entries: &[(usize, f64)]) -> MonthlySeries {
    let mut values = [None; 12];
    for (i, v) in entries {
        values[*i] = Some(*v);
    }
    MonthlySeries::from_values(values)
}

/// Cirebon-like inputs: June through September entered for both segments.
fn cirebon() -> (SeriesSet, Ceilings) {
    let mut s = SeriesSet::default();
    s.realized_expense.non_kur = at(&[(5, 276.0), (6, 50.0), (7, 53.0), (8, 33.232)]);
    s.target_expense.non_kur = at(&[
        (5, 223.0),
        (6, 263.5),
        (7, 298.0),
        (8, 334.8),
        (9, 372.27),
        (10, 407.0),
        (11, 449.56),
    ]);
    s.realized_expense.kur = at(&[(5, 117.0), (8, 46.501)]);
    s.target_expense.kur = at(&[(5, 334.0), (8, 500.0), (9, 558.4)]);
    s.realized_premium.non_kur = at(&[(5, 10352.0)]);
    s.realized_premium.kur = at(&[(5, 34099.0)]);
    s.target_premium.non_kur = at(&[(5, 7255.0), (8, 11000.0)]);
    s.target_premium.kur = at(&[(5, 41872.0), (8, 60000.0)]);
    let ceilings = Ceilings {
        non_kur: 449.564,
        kur: 700.0,
    };
    (s, ceilings)
}

#[test]
fn nominal_over_target_warns_with_remaining_budget() {
    let realized = at(&[(5, 276.0), (6, 50.0), (7, 53.0), (8, 33.232)]);
    let target = at(&[(5, 223.0), (6, 263.5), (7, 298.0), (8, 334.8)]);
    let nominal = compute_nominal(&realized, &target, 449.564, m(8));
    let ratio = compute_ratio(
        &MonthlySeries::empty(),
        &MonthlySeries::empty(),
        &MonthlySeries::empty(),
        &MonthlySeries::empty(),
        m(8),
    );
    let yoy = compute_yoy(&realized, &MonthlySeries::empty(), m(8));

    let w = collect_warnings(&nominal, &ratio, &yoy, "Non KUR");
    assert_eq!(w.len(), 1);
    assert_eq!(w[0].severity, Status::Danger);
    assert_eq!(w[0].parameter, Parameter::Nominal);
    assert_eq!(
        w[0].message,
        "Non KUR: realized expense EXCEEDED the YTD target (123.1%), remaining budget -77.43 million"
    );
}

#[test]
fn negative_budget_fallback_fires_without_target() {
    let nominal = compute_nominal(&at(&[(0, 50.0)]), &MonthlySeries::empty(), 0.0, m(0));
    let empty = MonthlySeries::empty();
    let ratio = compute_ratio(&empty, &empty, &empty, &empty, m(0));
    let yoy = compute_yoy(&empty, &empty, m(0));

    let w = collect_warnings(&nominal, &ratio, &yoy, "KUR");
    assert_eq!(w.len(), 1);
    assert_eq!(w[0].severity, Status::Danger);
    assert_eq!(
        w[0].message,
        "KUR: remaining budget is already NEGATIVE (-50.00 million)"
    );
}

#[test]
fn warnings_come_in_nominal_ratio_yoy_order() {
    // 85% of target, ratio 120% of target, spend up on last year
    let nominal = compute_nominal(&at(&[(0, 85.0)]), &at(&[(0, 100.0)]), 1000.0, m(0));
    let ratio = compute_ratio(
        &at(&[(0, 6.0)]),
        &at(&[(0, 100.0)]),
        &at(&[(0, 5.0)]),
        &at(&[(0, 100.0)]),
        m(0),
    );
    let yoy = compute_yoy(&at(&[(0, 85.0)]), &at(&[(0, 75.0)]), m(0));

    let w = collect_warnings(&nominal, &ratio, &yoy, "Combined");
    let order: Vec<_> = w.iter().map(|w| (w.parameter, w.severity)).collect();
    assert_eq!(
        order,
        vec![
            (Parameter::Nominal, Status::Caution),
            (Parameter::Ratio, Status::Danger),
            (Parameter::Yoy, Status::Danger),
        ]
    );
    assert_eq!(
        w[2].message,
        "Combined: marketing expense GREW 13.3% against last year"
    );
}

#[test]
fn safe_segment_has_no_warnings() {
    let nominal = compute_nominal(&at(&[(0, 10.0)]), &at(&[(0, 100.0)]), 1000.0, m(0));
    let ratio = compute_ratio(
        &at(&[(0, 1.0)]),
        &at(&[(0, 100.0)]),
        &at(&[(0, 5.0)]),
        &at(&[(0, 100.0)]),
        m(0),
    );
    let yoy = compute_yoy(&at(&[(0, 10.0)]), &at(&[(0, 20.0)]), m(0));
    assert!(collect_warnings(&nominal, &ratio, &yoy, "Non KUR").is_empty());
}

#[test]
fn breach_month_extrapolates_average_spend() {
    let realized = at(&[(0, 10.0), (1, 10.0), (2, 10.0)]);
    let target = at(&[(3, 45.0), (4, 45.0), (5, 55.0)]);
    // 30 so far, 10 a month: April 40 <= 45, May 50 > 45
    assert_eq!(forecast_breach_month(&realized, &target, Some(m(2))), Some(m(4)));
}

#[test]
fn breach_month_skips_months_without_target() {
    let realized = at(&[(0, 10.0), (1, 10.0), (2, 10.0)]);
    let target = at(&[(3, 0.0), (4, 100.0), (5, 55.0)]);
    assert_eq!(forecast_breach_month(&realized, &target, Some(m(2))), Some(m(5)));
}

#[test]
fn breach_month_absent_cases() {
    let realized = at(&[(0, 10.0)]);
    let generous = MonthlySeries::from_values([Some(1000.0); 12]);
    assert_eq!(forecast_breach_month(&realized, &generous, None), None);
    assert_eq!(
        forecast_breach_month(&MonthlySeries::empty(), &generous, Some(m(3))),
        None
    );
    assert_eq!(forecast_breach_month(&realized, &generous, Some(m(0))), None);
    assert_eq!(
        forecast_breach_month(&realized, &generous, Some(Month::DECEMBER)),
        None
    );
}

#[test]
fn kpis_combine_segments() {
    let (series, ceilings) = cirebon();
    let k = compute_kpis(&series, &ceilings, m(5));

    assert_eq!(k.non_kur.nominal.realized_to_date, 276.0);
    assert_eq!(k.kur.nominal.realized_to_date, 117.0);
    assert_eq!(k.combined.nominal.realized_to_date, 393.0);
    assert_eq!(k.combined.nominal.target_to_date, 557.0);
    assert_eq!(k.combined.ratio.realized_ratio, Some(0.88));
    assert_eq!(k.combined.ratio.target_ratio, Some(1.13));
    assert_eq!(k.combined.ratio.status, Status::Safe);
    assert_eq!(k.non_kur.ratio.status, Status::Caution);
}

#[test]
fn dashboard_orders_warnings_by_segment() {
    let (series, ceilings) = cirebon();
    let projection = ProjectionInputs::new(m(9));
    let d = compute_dashboard(&series, &ceilings, &projection, m(8));

    let labels: Vec<&str> = d
        .warnings
        .iter()
        .map(|w| w.message.split(':').next().unwrap())
        .collect();
    // KUR is within budget at September; Non KUR and Combined are not
    assert_eq!(labels, vec!["Non KUR", "Non KUR", "Combined"]);
    assert_eq!(d.warnings[0].parameter, Parameter::Nominal);
    assert_eq!(d.warnings[1].parameter, Parameter::Ratio);
    assert_eq!(d.warnings[2].parameter, Parameter::Ratio);
}

#[test]
fn dashboard_projects_from_prior_months() {
    let (series, ceilings) = cirebon();
    let mut projection = ProjectionInputs::new(m(9));
    projection.non_kur = HalfMonth {
        first_half: 27.6,
        second_half: 16.4,
    };
    projection.kur = HalfMonth {
        first_half: 0.0,
        second_half: 163.6,
    };
    let d = compute_dashboard(&series, &ceilings, &projection, m(8));
    let p = d.projection.expect("projection after January");

    assert_eq!(p.non_kur.prior_cumulative, 412.23);
    assert_eq!(p.non_kur.forward_target, 372.27);
    assert_eq!(p.non_kur.projected_total, 456.23);
    assert_eq!(p.non_kur.achievement_pct, Some(122.55));
    assert_eq!(p.non_kur.status, Status::Danger);

    assert_eq!(p.kur.prior_cumulative, 163.5);
    assert_eq!(p.kur.projected_total, 327.1);
    assert_eq!(p.kur.status, Status::Safe);

    assert_eq!(p.combined.forward_target, 372.27 + 558.4);
    assert_eq!(p.combined.projected_total, 783.33);
}

#[test]
fn no_projection_in_january() {
    let (series, ceilings) = cirebon();
    let d = compute_dashboard(&series, &ceilings, &ProjectionInputs::new(Month::JANUARY), m(8));
    assert!(d.projection.is_none());
}

#[test]
fn overrides_replace_one_slot_on_a_copy() {
    let (series, _) = cirebon();
    let before = series;
    let overrides = Overrides {
        month: m(8),
        expense: SegmentOverride {
            non_kur: Some(10.0),
            kur: None,
        },
        premium: SegmentOverride::default(),
    };
    let changed = apply_overrides(&series, &overrides);

    assert_eq!(series, before);
    assert_eq!(changed.realized_expense.non_kur.get(m(8)), Some(10.0));
    assert_eq!(changed.realized_expense.non_kur.get(m(7)), Some(53.0));
    assert_eq!(changed.realized_expense.kur, series.realized_expense.kur);
    assert_eq!(changed.target_expense, series.target_expense);
    assert_eq!(changed.realized_premium, series.realized_premium);
}

#[test]
fn simulation_compares_against_baseline() {
    let (series, ceilings) = cirebon();
    let overrides = Overrides {
        month: m(8),
        expense: SegmentOverride {
            non_kur: Some(0.0),
            kur: None,
        },
        premium: SegmentOverride::default(),
    };
    let out = simulate(&series, &ceilings, &overrides);

    assert_eq!(out.baseline, compute_kpis(&series, &ceilings, m(8)));
    assert_eq!(out.baseline.non_kur.nominal.realized_to_date, 412.23);
    assert_eq!(out.simulated.non_kur.nominal.realized_to_date, 379.0);
    assert_eq!(out.simulated.kur, out.baseline.kur);
}

#[test]
fn monthly_yoy_rows() {
    let mut s = SeriesSet::default();
    s.realized_expense.non_kur = at(&[(0, 60.0), (1, 40.0)]);
    s.realized_expense.kur = at(&[(0, 40.0)]);
    s.prior_expense.non_kur = at(&[(0, 80.0), (2, 10.0)]);

    let rows = monthly_yoy(&s.realized_expense, &s.prior_expense);
    assert_eq!(rows.len(), 12);

    assert!(rows[0].has_data);
    assert_eq!(rows[0].current, 100.0);
    assert_eq!(rows[0].prior, 80.0);
    assert_eq!(rows[0].difference, 20.0);
    assert_eq!(rows[0].growth_pct, Some(25.0));

    assert!(rows[1].has_data);
    assert_eq!(rows[1].growth_pct, None);

    assert_eq!(rows[2].current, 0.0);
    assert_eq!(rows[2].growth_pct, Some(-100.0));

    assert!(!rows[3].has_data);
}

#[test]
fn warning_percentages_round_ties_up() {
    let nominal = compute_nominal(&at(&[(0, 87.25)]), &at(&[(0, 100.0)]), 1000.0, m(0));
    assert_eq!(nominal.achievement_pct, Some(87.25));
    let empty = MonthlySeries::empty();
    let ratio = compute_ratio(&empty, &empty, &empty, &empty, m(0));
    let yoy = compute_yoy(&empty, &empty, m(0));

    let w = collect_warnings(&nominal, &ratio, &yoy, "KUR");
    assert_eq!(w.len(), 1);
    assert_eq!(
        w[0].message,
        "KUR: realized expense is approaching the YTD target (87.3%)"
    );
}

#[test]
fn simulation_reports_minimum_premium() {
    let (series, ceilings) = cirebon();
    let overrides = Overrides {
        month: m(8),
        expense: SegmentOverride {
            non_kur: Some(0.0),
            kur: None,
        },
        premium: SegmentOverride::default(),
    };
    let out = simulate(&series, &ceilings, &overrides);

    // 542.5 realized against a 1.18% combined target ratio
    assert_eq!(out.simulated.combined.nominal.realized_to_date, 542.5);
    assert_eq!(out.simulated.combined.ratio.target_ratio, Some(1.18));
    assert_eq!(out.minimum_premium, Some(45974.58));
    assert_eq!(out.minimum_premium, minimum_premium(&out.simulated.combined));
}

#[test]
fn minimum_premium_needs_a_positive_target_ratio() {
    let mut s = SeriesSet::default();
    s.realized_expense.non_kur = at(&[(0, 10.0)]);
    let ceilings = Ceilings {
        non_kur: 100.0,
        kur: 100.0,
    };
    let overrides = Overrides {
        month: m(0),
        expense: SegmentOverride {
            non_kur: None,
            kur: Some(5.0),
        },
        premium: SegmentOverride::default(),
    };
    assert_eq!(simulate(&s, &ceilings, &overrides).minimum_premium, None);

    // Premium target but a zero expense target: ratio 0, still undefined
    s.target_premium.non_kur = at(&[(0, 100.0)]);
    s.target_expense.non_kur = at(&[(0, 0.0)]);
    let out = simulate(&s, &ceilings, &overrides);
    assert_eq!(out.simulated.combined.ratio.target_ratio, Some(0.0));
    assert_eq!(out.minimum_premium, None);
}

#[test]
fn cumulative_ytd_combines_both_segments() {
    let (series, _) = cirebon();
    let rows = cumulative_ytd(&series.realized_expense, &series.target_expense);
    assert_eq!(rows.len(), 12);
    assert_eq!((rows[0].realized, rows[0].target), (0.0, 0.0));
    assert_eq!((rows[5].realized, rows[5].target), (393.0, 557.0));
    // Spend carries forward once entries stop
    assert_eq!(rows[9].realized, 575.73);
    assert_eq!(rows[9].target, 930.67);
    assert_eq!(rows[11].realized, 575.73);
}

#[test]
fn ratio_trend_only_for_months_with_expense() {
    let (series, _) = cirebon();
    let rows = ratio_trend(&series.realized_expense, &series.realized_premium);

    assert_eq!(rows[4].non_kur, None);
    assert_eq!(rows[4].combined, None);

    assert_eq!(rows[5].non_kur, Some(2.67));
    assert_eq!(rows[5].kur, Some(0.34));
    assert_eq!(rows[5].combined, Some(0.88));

    // KUR has no July entry but Non KUR does
    assert_eq!(rows[6].non_kur, Some(3.15));
    assert_eq!(rows[6].kur, Some(0.34));

    // No expense entered in October
    assert_eq!(rows[9].non_kur, None);
    assert_eq!(rows[9].kur, None);
}
