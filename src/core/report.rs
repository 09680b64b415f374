// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Transaction, TransactionType};
use crate::utils::{month_key, months_back};

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRollup {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income/expense/net for the most recent `month_count` calendar months
/// ending at the current month, oldest first. Months with no activity are
/// present with zeros so the sequence always has `month_count` entries.
pub fn monthly(
    transactions: &[Transaction],
    month_count: usize,
    today: NaiveDate,
) -> Vec<MonthlyRollup> {
    let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let entry = buckets
            .entry(month_key(tx.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount,
        }
    }

    let mut out = Vec::with_capacity(month_count);
    for back in (0..month_count).rev() {
        let key = month_key(months_back(today, back as u32));
        let (income, expense) = buckets.get(&key).copied().unwrap_or_default();
        out.push(MonthlyRollup {
            month: key,
            income,
            expense,
            net: income - expense,
        });
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRollup {
    pub category: String,
    pub income: Decimal,
    pub expense: Decimal,
    /// Activity volume (income + expense); the sort key.
    pub total: Decimal,
}

pub fn by_category(transactions: &[Transaction]) -> Vec<CategoryRollup> {
    let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let entry = buckets
            .entry(tx.category.clone())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount,
        }
    }
    let mut out: Vec<CategoryRollup> = buckets
        .into_iter()
        .map(|(category, (income, expense))| CategoryRollup {
            category,
            income,
            expense,
            total: income + expense,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// Month-over-month growth; None when the previous month is zero (rendered
/// as absent, never as infinity).
pub fn growth_percentage(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some((current - previous) / previous * Decimal::ONE_HUNDRED)
}
