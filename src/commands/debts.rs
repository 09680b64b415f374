// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

use crate::core::debt;
use crate::models::DebtKind;
use crate::store::debts::{self, NewDebt, NewPayment};
use crate::utils::{
    current_user, fmt_money, get_display_currency, maybe_print_json, parse_date, parse_decimal,
    parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("payments", sub)) => payments(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let kind = DebtKind::from_str(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Amount")?;
    let input = NewDebt {
        counterparty: sub.get_one::<String>("counterparty").unwrap().to_string(),
        amount,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        due_date: sub
            .get_one::<String>("due")
            .map(|s| parse_date(s))
            .transpose()?,
        kind,
        interest_rate: parse_decimal(sub.get_one::<String>("interest").unwrap())?,
    };
    let id = debts::create(conn, user_id, &input)?;
    match kind {
        DebtKind::Debt => println!(
            "Recorded debt of {} owed to {} (id {})",
            amount, input.counterparty, id
        ),
        DebtKind::Receivable => println!(
            "Recorded receivable of {} owed by {} (id {})",
            amount, input.counterparty, id
        ),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let items = debts::list(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let ccy = get_display_currency(conn)?;
        let rows = items
            .iter()
            .map(|d| {
                vec![
                    d.id.to_string(),
                    d.kind.to_string(),
                    d.counterparty.clone(),
                    format!("{:.2}", d.amount),
                    format!("{:.2}", d.remaining_amount),
                    d.status.to_string(),
                    d.due_date.map(|x| x.to_string()).unwrap_or_default(),
                    d.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Type",
                    "Counterparty",
                    &format!("Principal ({})", ccy),
                    "Remaining",
                    "Status",
                    "Due",
                    "Description"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Payment amount")?;
    let payment_date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let input = NewPayment {
        amount,
        payment_date,
        notes: sub.get_one::<String>("notes").map(|s| s.to_string()),
    };
    debts::apply_payment(conn, user_id, id, &input)?;
    let updated = debts::get(conn, user_id, id)?;
    let ccy = get_display_currency(conn)?;
    println!(
        "Payment of {} applied to {}; remaining {} ({})",
        fmt_money(&amount, &ccy),
        updated.counterparty,
        fmt_money(&updated.remaining_amount, &ccy),
        updated.status
    );
    Ok(())
}

fn payments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let items = debts::payments(conn, user_id, id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let rows = items
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.payment_date.to_string(),
                    format!("{:.2}", p.amount),
                    p.notes.clone().unwrap_or_default(),
                    p.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Amount", "Notes", "Recorded"], rows)
        );
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Local::now().date_naive();
    let s = debt::summarize(&debts::list(conn, user_id)?, today);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let ccy = get_display_currency(conn)?;
        let rows = vec![
            vec![
                "Total".into(),
                format!("{:.2}", s.total_debts),
                format!("{:.2}", s.total_receivables),
            ],
            vec![
                "Outstanding".into(),
                format!("{:.2}", s.pending_debts),
                format!("{:.2}", s.pending_receivables),
            ],
            vec![
                "Paid off".into(),
                format!("{:.2}", s.paid_debts),
                format!("{:.2}", s.paid_receivables),
            ],
            vec![
                "Overdue".into(),
                format!("{:.2}", s.overdue_debts),
                format!("{:.2}", s.overdue_receivables),
            ],
        ];
        println!(
            "{}",
            pretty_table(
                &[
                    &format!("Bucket ({})", ccy),
                    "Debts",
                    "Receivables"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    debts::delete(conn, user_id, id)?;
    println!("Removed debt {} and its payment history", id);
    Ok(())
}
