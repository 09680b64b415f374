// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::budget::{self, BudgetStatus};
use crate::core::debt::{self, DebtSummary};
use crate::core::goal;
use crate::core::report::{self, growth_percentage};
use crate::store::{budgets, debts, goals, transactions};
use crate::store::transactions::TxQuery;
use crate::utils::{current_user, maybe_print_json, month_key, months_back, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct CashflowRow {
    month: String,
    income: Decimal,
    expense: Decimal,
    net: Decimal,
    income_growth: Option<Decimal>,
    expense_growth: Option<Decimal>,
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap();
    let today = chrono::Local::now().date_naive();

    let txs = transactions::list(conn, user_id, &Default::default())?;
    let rollups = report::monthly(&txs, months, today);

    let mut data = Vec::with_capacity(rollups.len());
    let mut prev: Option<&report::MonthlyRollup> = None;
    for r in &rollups {
        data.push(CashflowRow {
            month: r.month.clone(),
            income: r.income,
            expense: r.expense,
            net: r.net,
            income_growth: prev.and_then(|p| growth_percentage(p.income, r.income)),
            expense_growth: prev.and_then(|p| growth_percentage(p.expense, r.expense)),
        });
        prev = Some(r);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                let pct = |g: Option<Decimal>| {
                    g.map(|v| format!("{:+.1}%", v)).unwrap_or_default()
                };
                vec![
                    r.month.clone(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                    format!("{:.2}", r.net),
                    pct(r.income_growth),
                    pct(r.expense_growth),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expense", "Net", "Income Δ", "Expense Δ"],
                rows
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap();
    let today = chrono::Local::now().date_naive();

    let window_start = months_back(today, months.saturating_sub(1) as u32);
    let txs = transactions::list(
        conn,
        user_id,
        &TxQuery {
            date_from: Some(window_start),
            ..Default::default()
        },
    )?;
    let data = report::by_category(&txs);

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    format!("{:.2}", c.income),
                    format!("{:.2}", c.expense),
                    format!("{:.2}", c.total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Income", "Expense", "Total"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct BudgetLine {
    category: String,
    period: String,
    percentage: Decimal,
    status: BudgetStatus,
}

#[derive(Serialize)]
struct GoalLine {
    title: String,
    percentage: Decimal,
    days_remaining: i64,
    overdue: bool,
}

#[derive(Serialize)]
struct Dashboard {
    month: String,
    income: Decimal,
    expense: Decimal,
    net: Decimal,
    expense_growth: Option<Decimal>,
    budgets: Vec<BudgetLine>,
    goals: Vec<GoalLine>,
    debts: DebtSummary,
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Local::now().date_naive();

    let txs = transactions::list(conn, user_id, &Default::default())?;
    // Two months so this month carries a growth figure against last month.
    let rollups = report::monthly(&txs, 2, today);
    let this_month = &rollups[1];
    let expense_growth = growth_percentage(rollups[0].expense, this_month.expense);

    let budget_lines: Vec<BudgetLine> = budgets::list(conn, user_id)?
        .iter()
        .map(|b| {
            let r = budget::evaluate(b, &txs, today);
            BudgetLine {
                category: b.category.clone(),
                period: b.period.to_string(),
                percentage: r.percentage,
                status: r.status,
            }
        })
        .collect();
    let goal_lines: Vec<GoalLine> = goals::list(conn, user_id)?
        .iter()
        .map(|g| {
            let p = goal::evaluate(g, today);
            GoalLine {
                title: g.title.clone(),
                percentage: p.percentage,
                days_remaining: p.days_remaining,
                overdue: p.overdue,
            }
        })
        .collect();
    let summary = debt::summarize(&debts::list(conn, user_id)?, today);

    let view = Dashboard {
        month: month_key(today),
        income: this_month.income,
        expense: this_month.expense,
        net: this_month.net,
        expense_growth,
        budgets: budget_lines,
        goals: goal_lines,
        debts: summary,
    };

    if !maybe_print_json(json_flag, jsonl_flag, &view)? {
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expense", "Net", "Expense Δ"],
                vec![vec![
                    view.month.clone(),
                    format!("{:.2}", view.income),
                    format!("{:.2}", view.expense),
                    format!("{:.2}", view.net),
                    view.expense_growth
                        .map(|g| format!("{:+.1}%", g))
                        .unwrap_or_default(),
                ]]
            )
        );
        if !view.budgets.is_empty() {
            let rows = view
                .budgets
                .iter()
                .map(|b| {
                    vec![
                        b.category.clone(),
                        b.period.clone(),
                        format!("{:.1}%", b.percentage),
                        b.status.to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Budget", "Period", "Use %", "Status"], rows)
            );
        }
        if !view.goals.is_empty() {
            let rows = view
                .goals
                .iter()
                .map(|g| {
                    let days = if g.overdue {
                        format!("overdue {}d", -g.days_remaining)
                    } else {
                        format!("{}d", g.days_remaining)
                    };
                    vec![g.title.clone(), format!("{:.1}%", g.percentage), days]
                })
                .collect();
            println!("{}", pretty_table(&["Goal", "Progress", "Left"], rows));
        }
        println!(
            "{}",
            pretty_table(
                &["", "Debts", "Receivables"],
                vec![
                    vec![
                        "Outstanding".into(),
                        format!("{:.2}", view.debts.pending_debts),
                        format!("{:.2}", view.debts.pending_receivables),
                    ],
                    vec![
                        "Overdue".into(),
                        format!("{:.2}", view.debts.overdue_debts),
                        format!("{:.2}", view.debts.overdue_receivables),
                    ],
                ]
            )
        );
    }
    Ok(())
}
