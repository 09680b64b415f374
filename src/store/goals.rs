// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::DomainError;
use crate::models::{FinancialGoal, GoalPriority};
use crate::utils::{lenient_decimal, non_empty};

pub struct NewGoal {
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub category: String,
    pub priority: GoalPriority,
}

#[derive(Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub priority: Option<GoalPriority>,
}

/// Creation checks the full rule set; `today` comes from the caller so the
/// deadline rule stays testable.
pub fn create(conn: &Connection, user_id: i64, input: &NewGoal, today: NaiveDate) -> Result<i64> {
    let title = non_empty(&input.title, "Title")?;
    let category = non_empty(&input.category, "Category")?;
    if input.target_amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Target amount must be greater than zero, got {}",
            input.target_amount
        ))
        .into());
    }
    if input.current_amount < Decimal::ZERO {
        return Err(
            DomainError::Validation("Current amount must not be negative".into()).into(),
        );
    }
    // Only enforced here; later funding may push current past target and
    // progress clamps at 100 instead.
    if input.current_amount > input.target_amount {
        return Err(DomainError::Validation(format!(
            "Current amount {} exceeds target {}",
            input.current_amount, input.target_amount
        ))
        .into());
    }
    if input.deadline < today {
        return Err(DomainError::Validation(format!(
            "Deadline {} is in the past",
            input.deadline
        ))
        .into());
    }
    conn.execute(
        "INSERT INTO goals(user_id, title, target_amount, current_amount, deadline, category, priority)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            user_id,
            title,
            input.target_amount.to_string(),
            input.current_amount.to_string(),
            input.deadline.to_string(),
            category,
            input.priority.as_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_goal(r: &rusqlite::Row<'_>) -> Result<FinancialGoal> {
    let id: i64 = r.get(0)?;
    let target_s: String = r.get(3)?;
    let current_s: String = r.get(4)?;
    let deadline_s: String = r.get(5)?;
    let priority_s: String = r.get(7)?;
    Ok(FinancialGoal {
        id,
        user_id: r.get(1)?,
        title: r.get(2)?,
        target_amount: lenient_decimal(&target_s, &format!("goal {}", id)),
        current_amount: lenient_decimal(&current_s, &format!("goal {}", id)),
        deadline: NaiveDate::parse_from_str(&deadline_s, "%Y-%m-%d").map_err(|_| {
            DomainError::Validation(format!("Invalid deadline '{}' on goal {}", deadline_s, id))
        })?,
        category: r.get(6)?,
        priority: GoalPriority::from_str(&priority_s)?,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
    })
}

const GOAL_COLUMNS: &str = "id, user_id, title, target_amount, current_amount, deadline, \
                            category, priority, created_at, updated_at";

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<FinancialGoal>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM goals WHERE user_id=?1 ORDER BY deadline, id",
        GOAL_COLUMNS
    ))?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_goal(r)?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<FinancialGoal> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM goals WHERE id=?1 AND user_id=?2",
        GOAL_COLUMNS
    ))?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => row_to_goal(r),
        None => Err(DomainError::NotFound { what: "goal", id }.into()),
    }
}

pub fn update(conn: &Connection, user_id: i64, id: i64, patch: &GoalPatch) -> Result<()> {
    let mut sets: Vec<String> = Vec::new();
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(ref t) = patch.title {
        sets.push("title=?".into());
        params_vec.push(non_empty(t, "Title")?);
    }
    if let Some(target) = patch.target_amount {
        if target <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Target amount must be greater than zero, got {}",
                target
            ))
            .into());
        }
        sets.push("target_amount=?".into());
        params_vec.push(target.to_string());
    }
    if let Some(current) = patch.current_amount {
        if current < Decimal::ZERO {
            return Err(
                DomainError::Validation("Current amount must not be negative".into()).into(),
            );
        }
        // No <= target re-check on update; progress clamps at 100.
        sets.push("current_amount=?".into());
        params_vec.push(current.to_string());
    }
    if let Some(deadline) = patch.deadline {
        sets.push("deadline=?".into());
        params_vec.push(deadline.to_string());
    }
    if let Some(ref c) = patch.category {
        sets.push("category=?".into());
        params_vec.push(non_empty(c, "Category")?);
    }
    if let Some(p) = patch.priority {
        sets.push("priority=?".into());
        params_vec.push(p.as_str().into());
    }
    if sets.is_empty() {
        return Err(DomainError::Validation("Nothing to update".into()).into());
    }
    sets.push("updated_at=datetime('now')".into());

    let sql = format!("UPDATE goals SET {} WHERE id=? AND user_id=?", sets.join(", "));
    params_vec.push(id.to_string());
    params_vec.push(user_id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let affected = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if affected == 0 {
        return Err(DomainError::NotFound { what: "goal", id }.into());
    }
    Ok(())
}

/// Add to current_amount. Funding may push past the target; progress clamps.
pub fn fund(conn: &mut Connection, user_id: i64, id: i64, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Funding amount must be greater than zero, got {}",
            amount
        ))
        .into());
    }
    let tx = conn.transaction()?;
    let goal = get(&tx, user_id, id)?;
    let new_current = goal.current_amount + amount;
    tx.execute(
        "UPDATE goals SET current_amount=?1, updated_at=datetime('now') WHERE id=?2 AND user_id=?3",
        params![new_current.to_string(), id, user_id],
    )?;
    tx.commit()?;
    Ok(new_current)
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM goals WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound { what: "goal", id }.into());
    }
    Ok(())
}
