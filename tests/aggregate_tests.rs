// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::core::aggregate::{self, TxFilter};
use dompet::models::{PaymentMethod, Transaction, TransactionType};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(date: &str, amount: &str, kind: TransactionType, category: &str) -> Transaction {
    Transaction {
        id: 0,
        user_id: 1,
        date: day(date),
        amount: d(amount),
        description: "test".into(),
        category: category.into(),
        subcategory: None,
        kind,
        payment_method: PaymentMethod::Cash,
        tags: Vec::new(),
        notes: None,
        location: None,
        recurring: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn empty_collection_sums_to_zero() {
    assert_eq!(aggregate::sum(&[], &TxFilter::default()), Decimal::ZERO);
}

#[test]
fn unmatched_filter_sums_to_zero() {
    let txs = vec![tx("2024-03-15", "100", TransactionType::Expense, "Makanan & Minuman")];
    let filter = TxFilter {
        category: Some("Transportasi"),
        ..Default::default()
    };
    assert_eq!(aggregate::sum(&txs, &filter), Decimal::ZERO);
}

#[test]
fn category_and_period_round_trip() {
    // Record 150000 in Makanan & Minuman, sum it back from the month start.
    let txs = vec![tx(
        "2024-03-15",
        "150000",
        TransactionType::Expense,
        "Makanan & Minuman",
    )];
    let filter = TxFilter {
        kind: Some(TransactionType::Expense),
        category: Some("Makanan & Minuman"),
        date_from: Some(day("2024-03-01")),
        ..Default::default()
    };
    assert_eq!(aggregate::sum(&txs, &filter), d("150000"));
}

#[test]
fn date_bounds_are_inclusive() {
    let txs = vec![
        tx("2024-03-01", "10", TransactionType::Expense, "A"),
        tx("2024-03-31", "20", TransactionType::Expense, "A"),
        tx("2024-02-29", "40", TransactionType::Expense, "A"),
        tx("2024-04-01", "80", TransactionType::Expense, "A"),
    ];
    let filter = TxFilter {
        date_from: Some(day("2024-03-01")),
        date_to: Some(day("2024-03-31")),
        ..Default::default()
    };
    assert_eq!(aggregate::sum(&txs, &filter), d("30"));
}

#[test]
fn type_filter_splits_income_from_expense() {
    let txs = vec![
        tx("2024-03-01", "5000", TransactionType::Income, "Gaji"),
        tx("2024-03-02", "1200", TransactionType::Expense, "Gaji"),
    ];
    let income = TxFilter {
        kind: Some(TransactionType::Income),
        ..Default::default()
    };
    let expense = TxFilter {
        kind: Some(TransactionType::Expense),
        ..Default::default()
    };
    assert_eq!(aggregate::sum(&txs, &income), d("5000"));
    assert_eq!(aggregate::sum(&txs, &expense), d("1200"));
}

#[test]
fn open_ended_window_takes_everything_since_from() {
    let txs = vec![
        tx("2024-01-10", "7", TransactionType::Expense, "A"),
        tx("2024-03-10", "11", TransactionType::Expense, "A"),
        tx("2025-01-10", "13", TransactionType::Expense, "A"),
    ];
    let filter = TxFilter {
        date_from: Some(day("2024-03-01")),
        ..Default::default()
    };
    assert_eq!(aggregate::sum(&txs, &filter), d("24"));
}
