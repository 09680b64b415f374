// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::core::report;
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
fn monthly_rollup_is_oldest_first_with_zero_months_present() {
    let today = day("2024-03-15");
    let txs = vec![
        tx("2024-01-10", "5000", TransactionType::Income, "Gaji"),
        tx("2024-01-12", "2000", TransactionType::Expense, "Makanan & Minuman"),
        tx("2024-03-01", "1000", TransactionType::Expense, "Transportasi"),
    ];
    let rollups = report::monthly(&txs, 3, today);
    assert_eq!(rollups.len(), 3);
    assert_eq!(rollups[0].month, "2024-01");
    assert_eq!(rollups[1].month, "2024-02");
    assert_eq!(rollups[2].month, "2024-03");

    assert_eq!(rollups[0].income, d("5000"));
    assert_eq!(rollups[0].expense, d("2000"));
    assert_eq!(rollups[0].net, d("3000"));

    // February had no activity but still appears.
    assert_eq!(rollups[1].income, Decimal::ZERO);
    assert_eq!(rollups[1].expense, Decimal::ZERO);

    assert_eq!(rollups[2].net, d("-1000"));
}

#[test]
fn monthly_rollup_drops_months_outside_the_window() {
    let today = day("2024-03-15");
    let txs = vec![
        tx("2023-11-10", "9999", TransactionType::Expense, "A"),
        tx("2024-03-02", "100", TransactionType::Expense, "A"),
    ];
    let rollups = report::monthly(&txs, 2, today);
    assert_eq!(rollups.len(), 2);
    assert_eq!(rollups[0].month, "2024-02");
    assert_eq!(rollups[1].expense, d("100"));
}

#[test]
fn window_spans_a_year_boundary() {
    let today = day("2024-01-20");
    let txs = vec![tx("2023-12-05", "700", TransactionType::Expense, "A")];
    let rollups = report::monthly(&txs, 2, today);
    assert_eq!(rollups[0].month, "2023-12");
    assert_eq!(rollups[0].expense, d("700"));
    assert_eq!(rollups[1].month, "2024-01");
}

#[test]
fn categories_sort_descending_by_activity() {
    let txs = vec![
        tx("2024-03-01", "100", TransactionType::Expense, "Transportasi"),
        tx("2024-03-02", "900", TransactionType::Expense, "Makanan & Minuman"),
        tx("2024-03-03", "500", TransactionType::Income, "Gaji"),
        tx("2024-03-04", "600", TransactionType::Income, "Makanan & Minuman"),
    ];
    let rollups = report::by_category(&txs);
    assert_eq!(rollups[0].category, "Makanan & Minuman");
    assert_eq!(rollups[0].income, d("600"));
    assert_eq!(rollups[0].expense, d("900"));
    assert_eq!(rollups[0].total, d("1500"));
    assert_eq!(rollups[1].category, "Gaji");
    assert_eq!(rollups[2].category, "Transportasi");
}

#[test]
fn growth_is_undefined_when_previous_month_is_zero() {
    assert_eq!(report::growth_percentage(Decimal::ZERO, d("100")), None);
    assert_eq!(
        report::growth_percentage(d("100"), d("150")),
        Some(d("50"))
    );
    assert_eq!(
        report::growth_percentage(d("200"), d("150")),
        Some(d("-25"))
    );
}
