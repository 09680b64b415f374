// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::core::report;
use crate::store::{debts, transactions};
use crate::utils::current_user;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("debts", sub)) => export_debts(conn, sub),
        Some(("cashflow", sub)) => export_cashflow(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let rows = transactions::list(conn, user_id, &Default::default())?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "type",
                "amount",
                "category",
                "subcategory",
                "description",
                "payment_method",
                "tags",
                "notes",
                "location",
                "recurring",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.subcategory.clone().unwrap_or_default(),
                    t.description.clone(),
                    t.payment_method.to_string(),
                    t.tags.join("|"),
                    t.notes.clone().unwrap_or_default(),
                    t.location.clone().unwrap_or_default(),
                    t.recurring.map(|f| f.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => {
            return Err(
                crate::error::DomainError::Validation(format!(
                    "Unknown format '{}' (use csv|json)",
                    fmt
                ))
                .into(),
            );
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

fn export_debts(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let rows = debts::list(conn, user_id)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "type",
                "counterparty",
                "amount",
                "remaining_amount",
                "status",
                "due_date",
                "interest_rate",
                "description",
            ])?;
            for d in &rows {
                wtr.write_record([
                    d.kind.to_string(),
                    d.counterparty.clone(),
                    d.amount.to_string(),
                    d.remaining_amount.to_string(),
                    d.status.to_string(),
                    d.due_date.map(|x| x.to_string()).unwrap_or_default(),
                    d.interest_rate.to_string(),
                    d.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => {
            return Err(
                crate::error::DomainError::Validation(format!(
                    "Unknown format '{}' (use csv|json)",
                    fmt
                ))
                .into(),
            );
        }
    }
    println!("Exported {} debts to {}", rows.len(), out);
    Ok(())
}

fn export_cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let months: usize = *sub.get_one::<usize>("months").unwrap();
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let today = chrono::Local::now().date_naive();

    let txs = transactions::list(conn, user_id, &Default::default())?;
    let rollups = report::monthly(&txs, months, today);
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["month", "income", "expense", "net"])?;
            for r in &rollups {
                wtr.write_record([
                    r.month.clone(),
                    r.income.to_string(),
                    r.expense.to_string(),
                    r.net.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rollups
                .iter()
                .map(|r| {
                    json!({
                        "month": r.month,
                        "income": r.income,
                        "expense": r.expense,
                        "net": r.net,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            return Err(
                crate::error::DomainError::Validation(format!(
                    "Unknown format '{}' (use csv|json)",
                    fmt
                ))
                .into(),
            );
        }
    }
    println!("Exported {}-month cashflow to {}", rollups.len(), out);
    Ok(())
}
