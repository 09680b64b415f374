// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::DomainError;
use crate::models::{Budget, BudgetPeriod};
use crate::utils::{lenient_decimal, non_empty};

pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
}

pub fn create(conn: &Connection, user_id: i64, input: &NewBudget) -> Result<i64> {
    let category = non_empty(&input.category, "Category")?;
    if input.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Budget amount must be greater than zero, got {}",
            input.amount
        ))
        .into());
    }
    // Checked before insert so the user sees a validation error, not a
    // constraint failure; UNIQUE(user_id, category, period) is the backstop.
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM budgets WHERE user_id=?1 AND category=?2 AND period=?3",
            params![user_id, category, input.period.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(DomainError::DuplicateBudget {
            category,
            period: input.period.as_str().to_string(),
        }
        .into());
    }
    conn.execute(
        "INSERT INTO budgets(user_id, category, amount, period) VALUES (?1,?2,?3,?4)",
        params![
            user_id,
            category,
            input.amount.to_string(),
            input.period.as_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_budget(r: &rusqlite::Row<'_>) -> Result<Budget> {
    let id: i64 = r.get(0)?;
    let amount_s: String = r.get(3)?;
    let period_s: String = r.get(4)?;
    Ok(Budget {
        id,
        user_id: r.get(1)?,
        category: r.get(2)?,
        amount: lenient_decimal(&amount_s, &format!("budget {}", id)),
        period: BudgetPeriod::from_str(&period_s)?,
        created_at: r.get(5)?,
    })
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, amount, period, created_at
         FROM budgets WHERE user_id=?1 ORDER BY category, period",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_budget(r)?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Budget> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, amount, period, created_at
         FROM budgets WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => row_to_budget(r),
        None => Err(DomainError::NotFound { what: "budget", id }.into()),
    }
}

pub fn update_amount(conn: &Connection, user_id: i64, id: i64, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Budget amount must be greater than zero, got {}",
            amount
        ))
        .into());
    }
    let affected = conn.execute(
        "UPDATE budgets SET amount=?1 WHERE id=?2 AND user_id=?3",
        params![amount.to_string(), id, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound { what: "budget", id }.into());
    }
    Ok(())
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM budgets WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound { what: "budget", id }.into());
    }
    Ok(())
}
