// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::DomainError;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amounts on transactions, budgets, goals, debts and payments must be > 0.
pub fn parse_positive_decimal(s: &str, what: &str) -> Result<Decimal, DomainError> {
    let d = s
        .parse::<Decimal>()
        .map_err(|_| DomainError::Validation(format!("Invalid {} '{}'", what, s)))?;
    if d <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "{} must be greater than zero, got {}",
            what, d
        )));
    }
    Ok(d)
}

/// Stored amounts are text; a row that no longer parses is counted as zero
/// rather than failing the whole aggregation. `doctor` reports such rows.
pub fn lenient_decimal(s: &str, what: &str) -> Decimal {
    match s.parse::<Decimal>() {
        Ok(d) => d,
        Err(_) => {
            eprintln!("warning: invalid amount '{}' in {}; counted as 0", s, what);
            Decimal::ZERO
        }
    }
}

pub fn non_empty(s: &str, what: &str) -> Result<String, DomainError> {
    let t = s.trim();
    if t.is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", what)));
    }
    Ok(t.to_string())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", ccy, d.round_dp(2))
}

pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
}

pub fn start_of_year(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
}

/// First day of the month `n` months before the current one.
pub fn months_back(today: NaiveDate, n: u32) -> NaiveDate {
    start_of_month(today)
        .checked_sub_months(Months::new(n))
        .unwrap_or(start_of_month(today))
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Display currency setting
pub fn get_display_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key='currency'", [], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.unwrap_or_else(|| "IDR".to_string()))
}

pub fn set_display_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

// Active profile. Only the CLI boundary reads this; store and core functions
// always take the user id as an explicit argument.
pub fn current_user(conn: &Connection) -> Result<i64> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='current_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let id = v
        .and_then(|s| s.parse::<i64>().ok())
        .context("No active profile; run 'dompet user use <email>' first")?;
    // The profile may have been deleted since the session was written.
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    exists.context("Active profile no longer exists; run 'dompet user use <email>'")
}

pub fn set_current_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('current_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user_id.to_string()],
    )?;
    Ok(())
}

pub fn clear_current_user(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key='current_user'", [])?;
    Ok(())
}
