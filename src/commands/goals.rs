// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;

use crate::core::goal;
use crate::models::{FinancialGoal, GoalPriority};
use crate::store::goals::{self, GoalPatch, NewGoal};
use crate::utils::{
    current_user, maybe_print_json, parse_date, parse_positive_decimal, pretty_table,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("fund", sub)) => fund(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let today = chrono::Local::now().date_naive();
    let target = parse_positive_decimal(sub.get_one::<String>("target").unwrap(), "Target amount")?;
    let current = crate::utils::parse_decimal(sub.get_one::<String>("current").unwrap())?;
    let input = NewGoal {
        title: sub.get_one::<String>("title").unwrap().to_string(),
        target_amount: target,
        current_amount: current,
        deadline: parse_date(sub.get_one::<String>("deadline").unwrap())?,
        category: sub.get_one::<String>("category").unwrap().to_string(),
        priority: GoalPriority::from_str(sub.get_one::<String>("priority").unwrap())?,
    };
    let id = goals::create(conn, user_id, &input, today)?;
    println!(
        "Added goal '{}' targeting {} by {} (id {})",
        input.title, target, input.deadline, id
    );
    Ok(())
}

#[derive(Serialize)]
struct GoalRow {
    #[serde(flatten)]
    goal: FinancialGoal,
    progress: goal::GoalProgress,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Local::now().date_naive();

    let items = goals::list(conn, user_id)?;
    let data: Vec<GoalRow> = items
        .into_iter()
        .map(|g| {
            let progress = goal::evaluate(&g, today);
            GoalRow { goal: g, progress }
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                let days = if r.progress.overdue {
                    format!("overdue {}d", -r.progress.days_remaining)
                } else {
                    format!("{}d", r.progress.days_remaining)
                };
                vec![
                    r.goal.id.to_string(),
                    r.goal.title.clone(),
                    r.goal.category.clone(),
                    r.goal.priority.to_string(),
                    format!("{:.2}", r.goal.target_amount),
                    format!("{:.2}", r.goal.current_amount),
                    format!("{:.1}%", r.progress.percentage),
                    r.goal.deadline.to_string(),
                    days,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Title", "Category", "Priority", "Target", "Saved", "Progress",
                    "Deadline", "Left"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = GoalPatch {
        title: sub.get_one::<String>("title").map(|s| s.to_string()),
        target_amount: sub
            .get_one::<String>("target")
            .map(|s| parse_positive_decimal(s, "Target amount"))
            .transpose()?,
        current_amount: sub
            .get_one::<String>("current")
            .map(|s| crate::utils::parse_decimal(s))
            .transpose()?,
        deadline: sub
            .get_one::<String>("deadline")
            .map(|s| parse_date(s))
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        priority: sub
            .get_one::<String>("priority")
            .map(|s| GoalPriority::from_str(s))
            .transpose()?,
    };
    goals::update(conn, user_id, id, &patch)?;
    println!("Updated goal {}", id);
    Ok(())
}

fn fund(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap(), "Funding amount")?;
    let new_current = goals::fund(conn, user_id, id, amount)?;
    println!("Goal {} funded with {}; saved {}", id, amount, new_current);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    goals::delete(conn, user_id, id)?;
    println!("Removed goal {}", id);
    Ok(())
}
