// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

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
            .help("Print as JSON Lines"),
    )
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Profiles and the active session")
        .subcommand(
            Command::new("add")
                .about("Create a profile")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true)),
        )
        .subcommand(json_flags(Command::new("list").about("List profiles")))
        .subcommand(
            Command::new("use")
                .about("Switch the active profile")
                .arg(Arg::new("email").required(true)),
        )
        .subcommand(Command::new("current").about("Show the active profile"))
        .subcommand(Command::new("signout").about("Clear the active profile"))
        .subcommand(
            Command::new("avatar")
                .about("Avatar image for the active profile")
                .subcommand(
                    Command::new("set")
                        .about("Store an image file as the avatar")
                        .arg(Arg::new("path").required(true)),
                )
                .subcommand(Command::new("path").about("Print the stored avatar path")),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Income and expense transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("subcategory").long("subcategory"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("income|expense"),
                )
                .arg(
                    Arg::new("method")
                        .long("method")
                        .default_value("cash")
                        .help("cash|credit_card|debit_card|bank_transfer|e_wallet"),
                )
                .arg(
                    Arg::new("tags")
                        .long("tags")
                        .help("Comma-separated tag list"),
                )
                .arg(Arg::new("notes").long("notes"))
                .arg(Arg::new("location").long("location"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .help("Mark recurring: daily|weekly|monthly|yearly"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("type").long("type").help("income|expense"))
                .arg(Arg::new("from").long("from").help("YYYY-MM-DD, inclusive"))
                .arg(Arg::new("to").long("to").help("YYYY-MM-DD, inclusive"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .action(ArgAction::SetTrue)
                        .help("Only recurring rows"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update fields of a transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("subcategory").long("subcategory"))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("method").long("method"))
                .arg(Arg::new("tags").long("tags"))
                .arg(Arg::new("notes").long("notes"))
                .arg(Arg::new("location").long("location"))
                .arg(Arg::new("recurring").long("recurring"))
                .arg(
                    Arg::new("no-recurring")
                        .long("no-recurring")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("recurring"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Spending ceilings per category and period")
        .subcommand(
            Command::new("add")
                .about("Create a budget (one per category and period)")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("period")
                        .long("period")
                        .default_value("monthly")
                        .help("monthly|yearly"),
                ),
        )
        .subcommand(json_flags(Command::new("list").about("List budgets")))
        .subcommand(json_flags(
            Command::new("status").about("Spent/remaining/status for the current period"),
        ))
        .subcommand(
            Command::new("set-amount")
                .about("Change a budget's ceiling")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a budget")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .about("Create a goal")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("current").long("current").default_value("0"))
                .arg(
                    Arg::new("deadline")
                        .long("deadline")
                        .required(true)
                        .help("YYYY-MM-DD, not in the past"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .default_value("medium")
                        .help("low|medium|high"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List goals with progress"),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update fields of a goal")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("title").long("title"))
                .arg(Arg::new("target").long("target"))
                .arg(Arg::new("current").long("current"))
                .arg(Arg::new("deadline").long("deadline"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("priority").long("priority")),
        )
        .subcommand(
            Command::new("fund")
                .about("Add savings toward a goal")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a goal")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn debt_cmd() -> Command {
    Command::new("debt")
        .about("Debts, receivables, and their payment ledger")
        .subcommand(
            Command::new("add")
                .about("Record a debt or receivable")
                .arg(Arg::new("counterparty").long("counterparty").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("due").long("due").help("YYYY-MM-DD"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("debt")
                        .help("debt|receivable"),
                )
                .arg(
                    Arg::new("interest")
                        .long("interest")
                        .default_value("0")
                        .help("Percent per year, informational"),
                ),
        )
        .subcommand(json_flags(Command::new("list").about("List debts and receivables")))
        .subcommand(
            Command::new("pay")
                .about("Apply a payment against the remaining balance")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("payments")
                .about("Payment audit trail for one debt")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Totals by type, pending, paid, overdue"),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a debt and its payments")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Trend and category reports")
        .subcommand(json_flags(
            Command::new("cashflow")
                .about("Monthly income/expense/net with growth")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("12")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("categories")
                .about("Per-category totals over recent months")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("12")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("dashboard").about("Current-month stats, budgets, goals, debts"),
        ))
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Write data to CSV or JSON files")
        .subcommand(
            Command::new("transactions")
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("debts")
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("cashflow")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("12")
                        .value_parser(value_parser!(usize)),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Settings")
        .subcommand(
            Command::new("currency")
                .about("Show or set the display currency")
                .arg(Arg::new("code")),
        )
}

fn serve_cmd() -> Command {
    Command::new("serve")
        .about("Serve the built web client")
        .arg(Arg::new("dir").long("dir").default_value("dist"))
        .arg(
            Arg::new("port")
                .long("port")
                .default_value("8080")
                .value_parser(value_parser!(u16)),
        )
}

pub fn build_cli() -> Command {
    Command::new("dompet")
        .about("Personal income/expense tracking, budgets, savings goals, and debt ledger")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(user_cmd())
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(debt_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(config_cmd())
        .subcommand(Command::new("doctor").about("Data-quality checks"))
        .subcommand(serve_cmd())
}
