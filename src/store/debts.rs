// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core;
use crate::error::DomainError;
use crate::models::{Debt, DebtKind, DebtPayment, DebtStatus};
use crate::utils::{lenient_decimal, non_empty};

pub struct NewDebt {
    pub counterparty: String,
    pub amount: Decimal,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub kind: DebtKind,
    pub interest_rate: Decimal,
}

pub struct NewPayment {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}

pub fn create(conn: &Connection, user_id: i64, input: &NewDebt) -> Result<i64> {
    let counterparty = non_empty(&input.counterparty, "Counterparty")?;
    let description = non_empty(&input.description, "Description")?;
    if input.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Amount must be greater than zero, got {}",
            input.amount
        ))
        .into());
    }
    if input.interest_rate < Decimal::ZERO {
        return Err(
            DomainError::Validation("Interest rate must not be negative".into()).into(),
        );
    }
    // remaining_amount starts at the principal; only payments move it.
    conn.execute(
        "INSERT INTO debts(user_id, counterparty, amount, remaining_amount, description,
                           due_date, status, type, interest_rate)
         VALUES (?1,?2,?3,?4,?5,?6,'pending',?7,?8)",
        params![
            user_id,
            counterparty,
            input.amount.to_string(),
            input.amount.to_string(),
            description,
            input.due_date.map(|d| d.to_string()),
            input.kind.as_str(),
            input.interest_rate.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

const DEBT_COLUMNS: &str = "id, user_id, counterparty, amount, remaining_amount, description, \
                            due_date, status, type, interest_rate, created_at, updated_at";

fn row_to_debt(r: &rusqlite::Row<'_>) -> Result<Debt> {
    let id: i64 = r.get(0)?;
    let amount_s: String = r.get(3)?;
    let remaining_s: String = r.get(4)?;
    let due_s: Option<String> = r.get(6)?;
    let status_s: String = r.get(7)?;
    let kind_s: String = r.get(8)?;
    let rate_s: String = r.get(9)?;
    let due_date = match due_s {
        Some(s) => Some(
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid due date '{}' on debt {}", s, id))?,
        ),
        None => None,
    };
    Ok(Debt {
        id,
        user_id: r.get(1)?,
        counterparty: r.get(2)?,
        amount: lenient_decimal(&amount_s, &format!("debt {}", id)),
        remaining_amount: lenient_decimal(&remaining_s, &format!("debt {}", id)),
        description: r.get(5)?,
        due_date,
        status: DebtStatus::from_str(&status_s)?,
        kind: DebtKind::from_str(&kind_s)?,
        interest_rate: lenient_decimal(&rate_s, &format!("debt {}", id)),
        created_at: r.get(10)?,
        updated_at: r.get(11)?,
    })
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Debt>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM debts WHERE user_id=?1 ORDER BY due_date IS NULL, due_date, id",
        DEBT_COLUMNS
    ))?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_debt(r)?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Debt> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM debts WHERE id=?1 AND user_id=?2",
        DEBT_COLUMNS
    ))?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => row_to_debt(r),
        None => Err(DomainError::NotFound { what: "debt", id }.into()),
    }
}

/// Apply a payment and decrement the balance in one transaction.
///
/// The balance is re-read under an IMMEDIATE transaction and the update
/// carries a compare-and-swap predicate on the value read, so two payments
/// racing on the same debt can never jointly overpay it: the slower one
/// either re-validates against the new balance or aborts with a conflict.
pub fn apply_payment(
    conn: &mut Connection,
    user_id: i64,
    debt_id: i64,
    input: &NewPayment,
) -> Result<DebtPayment> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let remaining_text: Option<String> = tx
        .query_row(
            "SELECT remaining_amount FROM debts WHERE id=?1 AND user_id=?2",
            params![debt_id, user_id],
            |r| r.get(0),
        )
        .optional()?;
    let remaining_text = remaining_text.ok_or(DomainError::NotFound {
        what: "debt",
        id: debt_id,
    })?;
    // Strict parse here: refusing to pay against a corrupt balance beats
    // silently treating it as zero.
    let remaining = remaining_text
        .parse::<Decimal>()
        .map_err(|_| {
            DomainError::Conflict(format!(
                "Debt {} has unreadable balance '{}'; run doctor",
                debt_id, remaining_text
            ))
        })?;

    let (new_remaining, new_status) = core::debt::apply_payment(remaining, input.amount)?;

    let affected = tx.execute(
        "UPDATE debts SET remaining_amount=?1, status=?2, updated_at=datetime('now')
         WHERE id=?3 AND user_id=?4 AND remaining_amount=?5",
        params![
            new_remaining.to_string(),
            new_status.as_str(),
            debt_id,
            user_id,
            remaining_text
        ],
    )?;
    if affected != 1 {
        return Err(DomainError::Conflict(format!(
            "Debt {} changed while the payment was being applied; retry",
            debt_id
        ))
        .into());
    }

    tx.execute(
        "INSERT INTO debt_payments(user_id, debt_id, amount, payment_date, notes)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            user_id,
            debt_id,
            input.amount.to_string(),
            input.payment_date.to_string(),
            input.notes.as_deref()
        ],
    )?;
    let payment_id = tx.last_insert_rowid();
    let created_at: String = tx.query_row(
        "SELECT created_at FROM debt_payments WHERE id=?1",
        params![payment_id],
        |r| r.get(0),
    )?;
    tx.commit()?;

    Ok(DebtPayment {
        id: payment_id,
        user_id,
        debt_id,
        amount: input.amount,
        payment_date: input.payment_date,
        notes: input.notes.clone(),
        created_at,
    })
}

/// Audit trail for one debt, oldest first.
pub fn payments(conn: &Connection, user_id: i64, debt_id: i64) -> Result<Vec<DebtPayment>> {
    // Surface a not-found for the debt itself rather than an empty list.
    get(conn, user_id, debt_id)?;
    let mut stmt = conn.prepare(
        "SELECT id, user_id, debt_id, amount, payment_date, notes, created_at
         FROM debt_payments WHERE debt_id=?1 AND user_id=?2 ORDER BY payment_date, id",
    )?;
    let mut rows = stmt.query(params![debt_id, user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(3)?;
        let date_s: String = r.get(4)?;
        out.push(DebtPayment {
            id,
            user_id: r.get(1)?,
            debt_id: r.get(2)?,
            amount: lenient_decimal(&amount_s, &format!("payment {}", id)),
            payment_date: NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
                .with_context(|| format!("Invalid payment date '{}' on payment {}", date_s, id))?,
            notes: r.get(5)?,
            created_at: r.get(6)?,
        });
    }
    Ok(out)
}

/// Deleting a debt cascades to its payments (FK ON DELETE CASCADE); an
/// audit trail without its debt has nothing to audit.
pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM debts WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound { what: "debt", id }.into());
    }
    Ok(())
}
