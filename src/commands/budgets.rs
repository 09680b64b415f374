// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;

use crate::core::budget::{self, BudgetStatus};
use crate::models::BudgetPeriod;
use crate::store::{budgets, transactions};
use crate::utils::{
    current_user, get_display_currency, maybe_print_json, parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        Some(("set-amount", sub)) => set_amount(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let category = sub.get_one::<String>("category").unwrap().to_string();
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Budget amount")?;
    let period = BudgetPeriod::from_str(sub.get_one::<String>("period").unwrap())?;
    let id = budgets::create(
        conn,
        user_id,
        &budgets::NewBudget {
            category: category.clone(),
            amount,
            period,
        },
    )?;
    println!("Added {} budget for {} = {} (id {})", period, category, amount, id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let items = budgets::list(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let ccy = get_display_currency(conn)?;
        let rows = items
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.category.clone(),
                    b.period.to_string(),
                    format!("{:.2}", b.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Category", "Period", &format!("Ceiling ({})", ccy)],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct BudgetStatusRow {
    id: i64,
    category: String,
    period: String,
    amount: String,
    spent: String,
    remaining: String,
    percentage: String,
    status: BudgetStatus,
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Local::now().date_naive();

    let items = budgets::list(conn, user_id)?;
    let txs = transactions::list(conn, user_id, &Default::default())?;

    let mut data = Vec::new();
    for b in &items {
        let report = budget::evaluate(b, &txs, today);
        data.push(BudgetStatusRow {
            id: b.id,
            category: b.category.clone(),
            period: b.period.to_string(),
            amount: format!("{:.2}", b.amount),
            spent: format!("{:.2}", report.spent),
            remaining: format!("{:.2}", report.remaining),
            percentage: format!("{:.1}", report.percentage),
            status: report.status,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = get_display_currency(conn)?;
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.category,
                    r.period,
                    r.amount,
                    r.spent,
                    r.remaining,
                    r.percentage,
                    r.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Category",
                    "Period",
                    &format!("Ceiling ({})", ccy),
                    "Spent",
                    "Remaining",
                    "Use %",
                    "Status"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn set_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Budget amount")?;
    budgets::update_amount(conn, user_id, id, amount)?;
    println!("Budget {} ceiling set to {}", id, amount);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    budgets::delete(conn, user_id, id)?;
    println!("Removed budget {}", id);
    Ok(())
}
