// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn segment_arg() -> Arg {
    Arg::new("segment")
        .long("segment")
        .required(true)
        .help("non-kur | kur")
}

fn kind_arg() -> Arg {
    Arg::new("kind").long("kind").required(true).help(
        "target_expense | target_premium | realized_expense | realized_premium | prior_expense",
    )
}

const AMOUNT_FORMAT: &str = "Millions of rupiah: 1234.5 or 1.234,5";

fn amount_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .allow_negative_numbers(true)
        .help(AMOUNT_FORMAT)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("branchkpi")
        .about("Marketing-expense budget KPIs for a branch office")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("profile")
                .about("Branch identity and reporting years")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("branch").long("branch"))
                        .arg(Arg::new("region").long("region"))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("prior-year")
                                .long("prior-year")
                                .value_parser(value_parser!(i32)),
                        ),
                ),
        )
        .subcommand(
            Command::new("ceiling")
                .about("Annual budget ceilings and their revision")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(segment_arg())
                        .arg(amount_arg("amount").required(true))
                        .arg(
                            Arg::new("version")
                                .long("version")
                                .help("initial | revised (default: the active one)"),
                        ),
                )
                .subcommand(
                    Command::new("revise").about("Start a revision from the initial ceilings"),
                )
                .subcommand(Command::new("drop-revision"))
                .subcommand(
                    Command::new("activate").arg(
                        Arg::new("version")
                            .long("version")
                            .required(true)
                            .help("initial | revised"),
                    ),
                ),
        )
        .subcommand(
            Command::new("month")
                .about("Active reporting month")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("month")
                            .long("month")
                            .required(true)
                            .help("1-12 or a month name"),
                    ),
                ),
        )
        .subcommand(
            Command::new("series")
                .about("Monthly target, realized and prior-year figures")
                .subcommand(json_flags(Command::new("show").arg(kind_arg())))
                .subcommand(
                    Command::new("set")
                        .arg(kind_arg())
                        .arg(segment_arg())
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("value")
                                .long("value")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Millions of rupiah (1234.5 or 1.234,5); empty or '-' clears the month"),
                        ),
                )
                .subcommand(
                    Command::new("clear")
                        .arg(kind_arg())
                        .arg(segment_arg())
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("Clear one month only (default: the whole year)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("projection")
                .about("Half-month inputs for the month in progress")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("segment").long("segment"))
                        .arg(amount_arg("first"))
                        .arg(amount_arg("second")),
                ),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("KPIs, projection and warnings for a month")
                .arg(Arg::new("month").long("month")),
        ))
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_flags(
                    Command::new("yoy").about("Month-by-month expense against last year"),
                ))
                .subcommand(json_flags(
                    Command::new("ytd").about("Cumulative realized expense against target"),
                ))
                .subcommand(json_flags(
                    Command::new("ratio").about("Year-to-date expense ratio per month"),
                )),
        )
        .subcommand(json_flags(
            Command::new("simulate")
                .about("What-if: override one month's realized figures")
                .arg(Arg::new("month").long("month"))
                .arg(amount_arg("expense-non-kur"))
                .arg(amount_arg("expense-kur"))
                .arg(amount_arg("premium-non-kur"))
                .arg(amount_arg("premium-kur"))
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .action(ArgAction::SetTrue)
                        .help("Store the overrides as realized figures"),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Write all inputs to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json | csv"),
                )
                .arg(Arg::new("out").long("out")),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all inputs from a .json or .csv export")
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Saved copies of the whole input set")
                .subcommand(Command::new("save").arg(Arg::new("label").long("label")))
                .subcommand(Command::new("update").about("Refresh the active snapshot"))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("load").arg(id_arg()))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg())
                        .arg(Arg::new("label").long("label").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("reset")
                .about("Clear profile, ceilings, series and projection inputs (snapshots are kept)")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the reset"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check inputs for inconsistencies"))
}
