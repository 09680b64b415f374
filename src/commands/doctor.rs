// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::utils::pretty_table;

/// Whole-database sweep, not scoped to the active profile: aggregation
/// treats unreadable amounts as zero, so stale rows silently skew reports
/// until someone fixes them.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Stored amounts that no longer parse as decimals
    for (table, col) in [
        ("transactions", "amount"),
        ("budgets", "amount"),
        ("goals", "target_amount"),
        ("goals", "current_amount"),
        ("debts", "amount"),
        ("debts", "remaining_amount"),
        ("debt_payments", "amount"),
    ] {
        let mut stmt = conn.prepare(&format!("SELECT id, {} FROM {}", col, table))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let v: String = r.get(1)?;
            if v.parse::<Decimal>().is_err() {
                rows.push(vec![
                    "unparseable_amount".into(),
                    format!("{}.{} id={} value='{}'", table, col, id, v),
                ]);
            }
        }
    }

    // 2) Debt balances outside [0, amount] and statuses that disagree with
    //    the balance
    let mut stmt = conn.prepare("SELECT id, amount, remaining_amount, status FROM debts")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let remaining_s: String = r.get(2)?;
        let status: String = r.get(3)?;
        let (Ok(amount), Ok(remaining)) =
            (amount_s.parse::<Decimal>(), remaining_s.parse::<Decimal>())
        else {
            continue; // already reported above
        };
        if remaining < Decimal::ZERO || remaining > amount {
            rows.push(vec![
                "remaining_out_of_range".into(),
                format!("debt id={} amount={} remaining={}", id, amount, remaining),
            ]);
        }
        if remaining.is_zero() && status != "paid" {
            rows.push(vec![
                "status_should_be_paid".into(),
                format!("debt id={} status={}", id, status),
            ]);
        }
        if remaining > Decimal::ZERO && status == "paid" {
            rows.push(vec![
                "paid_with_balance".into(),
                format!("debt id={} remaining={}", id, remaining),
            ]);
        }
    }

    // 3) Pending debts that nonetheless have payments on record
    let mut stmt = conn.prepare(
        "SELECT DISTINCT d.id FROM debts d JOIN debt_payments p ON p.debt_id=d.id
         WHERE d.status='pending'",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "pending_with_payments".into(),
            format!("debt id={}", id),
        ]);
    }

    // 4) Payments summing past the principal
    let mut stmt = conn.prepare("SELECT id, amount FROM debts")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let Ok(amount) = amount_s.parse::<Decimal>() else {
            continue;
        };
        let mut pstmt =
            conn.prepare("SELECT amount FROM debt_payments WHERE debt_id=?1")?;
        let mut pcur = pstmt.query([id])?;
        let mut paid = Decimal::ZERO;
        while let Some(p) = pcur.next()? {
            let v: String = p.get(0)?;
            if let Ok(d) = v.parse::<Decimal>() {
                paid += d;
            }
        }
        if paid > amount {
            rows.push(vec![
                "payments_exceed_principal".into(),
                format!("debt id={} principal={} paid={}", id, amount, paid),
            ]);
        }
    }

    // 5) Recurring flag and frequency out of step
    let mut stmt = conn.prepare(
        "SELECT id FROM transactions
         WHERE (is_recurring=1 AND recurring_frequency IS NULL)
            OR (is_recurring=0 AND recurring_frequency IS NOT NULL)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "recurring_flag_mismatch".into(),
            format!("transaction id={}", id),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
