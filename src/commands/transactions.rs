// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

use crate::models::{PaymentMethod, RecurringFrequency, TransactionType};
use crate::store::transactions::{self, NewTransaction, TransactionPatch, TxQuery};
use crate::utils::{
    current_user, maybe_print_json, parse_date, parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Amount")?;
    let kind = TransactionType::from_str(sub.get_one::<String>("type").unwrap())?;
    let payment_method = PaymentMethod::from_str(sub.get_one::<String>("method").unwrap())?;
    let recurring = sub
        .get_one::<String>("recurring")
        .map(|f| RecurringFrequency::from_str(f))
        .transpose()?;

    let input = NewTransaction {
        date,
        amount,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        category: sub.get_one::<String>("category").unwrap().to_string(),
        subcategory: sub.get_one::<String>("subcategory").map(|s| s.to_string()),
        kind,
        payment_method,
        tags: sub
            .get_one::<String>("tags")
            .map(|s| parse_tags(s))
            .unwrap_or_default(),
        notes: sub.get_one::<String>("notes").map(|s| s.to_string()),
        location: sub.get_one::<String>("location").map(|s| s.to_string()),
        recurring,
    };
    let id = transactions::create(conn, user_id, &input)?;
    println!(
        "Recorded {} {} '{}' in {} on {} (id {})",
        input.kind, amount, input.description, input.category, date, id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let kind = sub
        .get_one::<String>("type")
        .map(|s| TransactionType::from_str(s))
        .transpose()?;
    let date_from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let date_to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let q = TxQuery {
        month: sub.get_one::<String>("month").map(|s| s.as_str()),
        category: sub.get_one::<String>("category").map(|s| s.as_str()),
        kind,
        date_from,
        date_to,
        recurring_only: sub.get_flag("recurring"),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let rows = transactions::list(conn, user_id, &q)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    format!("{:.2}", t.amount),
                    t.category.clone(),
                    t.description.clone(),
                    t.payment_method.to_string(),
                    t.recurring.map(|f| f.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Description", "Method", "Recurring"],
                data
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut patch = TransactionPatch {
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_positive_decimal(s, "Amount"))
            .transpose()?,
        description: sub.get_one::<String>("description").map(|s| s.to_string()),
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        subcategory: sub.get_one::<String>("subcategory").map(|s| s.to_string()),
        kind: sub
            .get_one::<String>("type")
            .map(|s| TransactionType::from_str(s))
            .transpose()?,
        payment_method: sub
            .get_one::<String>("method")
            .map(|s| PaymentMethod::from_str(s))
            .transpose()?,
        tags: sub.get_one::<String>("tags").map(|s| parse_tags(s)),
        notes: sub.get_one::<String>("notes").map(|s| s.to_string()),
        location: sub.get_one::<String>("location").map(|s| s.to_string()),
        recurring: None,
    };
    if sub.get_flag("no-recurring") {
        patch.recurring = Some(None);
    } else if let Some(freq) = sub.get_one::<String>("recurring") {
        patch.recurring = Some(Some(RecurringFrequency::from_str(freq)?));
    }

    transactions::update(conn, user_id, id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    transactions::delete(conn, user_id, id)?;
    println!("Removed transaction {}", id);
    Ok(())
}
