// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::DomainError;
use crate::models::{PaymentMethod, RecurringFrequency, Transaction, TransactionType};
use crate::utils::{lenient_decimal, non_empty};

pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub kind: TransactionType,
    pub payment_method: PaymentMethod,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub recurring: Option<RecurringFrequency>,
}

#[derive(Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub kind: Option<TransactionType>,
    pub payment_method: Option<PaymentMethod>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub location: Option<String>,
    /// Some(Some(f)) marks recurring with frequency f, Some(None) clears it.
    pub recurring: Option<Option<RecurringFrequency>>,
}

/// Filters for `list`; all optional, combined with AND.
#[derive(Default)]
pub struct TxQuery<'a> {
    pub month: Option<&'a str>, // YYYY-MM
    pub category: Option<&'a str>,
    pub kind: Option<TransactionType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub recurring_only: bool,
    pub limit: Option<usize>,
}

pub fn create(conn: &Connection, user_id: i64, input: &NewTransaction) -> Result<i64> {
    if input.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Amount must be greater than zero, got {}",
            input.amount
        ))
        .into());
    }
    let description = non_empty(&input.description, "Description")?;
    let category = non_empty(&input.category, "Category")?;
    conn.execute(
        "INSERT INTO transactions(user_id, date, amount, description, category, subcategory,
                                  type, payment_method, tags, notes, location,
                                  is_recurring, recurring_frequency)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            user_id,
            input.date.to_string(),
            input.amount.to_string(),
            description,
            category,
            input.subcategory.as_deref(),
            input.kind.as_str(),
            input.payment_method.as_str(),
            serde_json::to_string(&input.tags)?,
            input.notes.as_deref(),
            input.location.as_deref(),
            input.recurring.is_some() as i64,
            input.recurring.map(|f| f.as_str()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

const TX_COLUMNS: &str = "id, user_id, date, amount, description, category, subcategory, type, \
                          payment_method, tags, notes, location, is_recurring, \
                          recurring_frequency, created_at, updated_at";

fn row_to_tx(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let id: i64 = r.get(0)?;
    let date_s: String = r.get(2)?;
    let amount_s: String = r.get(3)?;
    let kind_s: String = r.get(7)?;
    let method_s: String = r.get(8)?;
    let tags_s: String = r.get(9)?;
    let is_recurring: bool = r.get(12)?;
    let freq_s: Option<String> = r.get(13)?;

    let recurring = if is_recurring {
        match freq_s.as_deref() {
            Some(f) => Some(RecurringFrequency::from_str(f)?),
            // Flag without frequency; doctor flags it, reads degrade to
            // non-recurring.
            None => None,
        }
    } else {
        None
    };

    Ok(Transaction {
        id,
        user_id: r.get(1)?,
        date: NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' on transaction {}", date_s, id))?,
        amount: lenient_decimal(&amount_s, &format!("transaction {}", id)),
        description: r.get(4)?,
        category: r.get(5)?,
        subcategory: r.get(6)?,
        kind: TransactionType::from_str(&kind_s)?,
        payment_method: PaymentMethod::from_str(&method_s)?,
        tags: serde_json::from_str(&tags_s).unwrap_or_default(),
        notes: r.get(10)?,
        location: r.get(11)?,
        recurring,
        created_at: r.get(14)?,
        updated_at: r.get(15)?,
    })
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE id=?1 AND user_id=?2",
        TX_COLUMNS
    ))?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => row_to_tx(r),
        None => Err(DomainError::NotFound {
            what: "transaction",
            id,
        }
        .into()),
    }
}

pub fn list(conn: &Connection, user_id: i64, q: &TxQuery) -> Result<Vec<Transaction>> {
    let mut sql = format!(
        "SELECT {} FROM transactions WHERE user_id=?",
        TX_COLUMNS
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = q.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = q.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    if let Some(kind) = q.kind {
        sql.push_str(" AND type=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(from) = q.date_from {
        sql.push_str(" AND date>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = q.date_to {
        sql.push_str(" AND date<=?");
        params_vec.push(to.to_string());
    }
    if q.recurring_only {
        sql.push_str(" AND is_recurring=1");
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_tx(r)?);
    }
    Ok(out)
}

pub fn update(conn: &Connection, user_id: i64, id: i64, patch: &TransactionPatch) -> Result<()> {
    let mut sets: Vec<String> = Vec::new();
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(date) = patch.date {
        sets.push("date=?".into());
        params_vec.push(date.to_string());
    }
    if let Some(amount) = patch.amount {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Amount must be greater than zero, got {}",
                amount
            ))
            .into());
        }
        sets.push("amount=?".into());
        params_vec.push(amount.to_string());
    }
    if let Some(ref d) = patch.description {
        sets.push("description=?".into());
        params_vec.push(non_empty(d, "Description")?);
    }
    if let Some(ref c) = patch.category {
        sets.push("category=?".into());
        params_vec.push(non_empty(c, "Category")?);
    }
    if let Some(ref s) = patch.subcategory {
        sets.push("subcategory=?".into());
        params_vec.push(s.clone());
    }
    if let Some(kind) = patch.kind {
        sets.push("type=?".into());
        params_vec.push(kind.as_str().into());
    }
    if let Some(method) = patch.payment_method {
        sets.push("payment_method=?".into());
        params_vec.push(method.as_str().into());
    }
    if let Some(ref tags) = patch.tags {
        sets.push("tags=?".into());
        params_vec.push(serde_json::to_string(tags)?);
    }
    if let Some(ref n) = patch.notes {
        sets.push("notes=?".into());
        params_vec.push(n.clone());
    }
    if let Some(ref l) = patch.location {
        sets.push("location=?".into());
        params_vec.push(l.clone());
    }
    if let Some(recurring) = &patch.recurring {
        match recurring {
            Some(freq) => {
                sets.push("is_recurring=1, recurring_frequency=?".into());
                params_vec.push(freq.as_str().into());
            }
            None => {
                sets.push("is_recurring=0, recurring_frequency=NULL".into());
            }
        }
    }
    if sets.is_empty() {
        return Err(DomainError::Validation("Nothing to update".into()).into());
    }
    sets.push("updated_at=datetime('now')".into());

    let sql = format!(
        "UPDATE transactions SET {} WHERE id=? AND user_id=?",
        sets.join(", ")
    );
    params_vec.push(id.to_string());
    params_vec.push(user_id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let affected = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if affected == 0 {
        return Err(DomainError::NotFound {
            what: "transaction",
            id,
        }
        .into());
    }
    Ok(())
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound {
            what: "transaction",
            id,
        }
        .into());
    }
    Ok(())
}

