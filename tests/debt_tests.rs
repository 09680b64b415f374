// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::core::debt::{self, DebtSummary};
use dompet::error::DomainError;
use dompet::models::{Debt, DebtKind, DebtStatus};
use dompet::store::debts::{self, NewDebt, NewPayment};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    dompet::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(name,email) VALUES('Test','t@example.com')",
        [],
    )
    .unwrap();
    conn
}

fn new_debt(amount: &str, kind: DebtKind) -> NewDebt {
    NewDebt {
        counterparty: "Budi".into(),
        amount: d(amount),
        description: "Pinjaman".into(),
        due_date: None,
        kind,
        interest_rate: Decimal::ZERO,
    }
}

fn payment(amount: &str, date: &str) -> NewPayment {
    NewPayment {
        amount: d(amount),
        payment_date: day(date),
        notes: None,
    }
}

#[test]
fn creation_starts_pending_at_full_principal() {
    let conn = setup();
    let id = debts::create(&conn, 1, &new_debt("1000000", DebtKind::Debt)).unwrap();
    let debt = debts::get(&conn, 1, id).unwrap();
    assert_eq!(debt.amount, d("1000000"));
    assert_eq!(debt.remaining_amount, d("1000000"));
    assert_eq!(debt.status, DebtStatus::Pending);
}

#[test]
fn payments_walk_pending_partial_paid_and_then_reject() {
    let mut conn = setup();
    let id = debts::create(&mut conn, 1, &new_debt("1000000", DebtKind::Debt)).unwrap();

    debts::apply_payment(&mut conn, 1, id, &payment("400000", "2024-03-01")).unwrap();
    let debt = debts::get(&conn, 1, id).unwrap();
    assert_eq!(debt.remaining_amount, d("600000"));
    assert_eq!(debt.status, DebtStatus::Partial);

    debts::apply_payment(&mut conn, 1, id, &payment("600000", "2024-03-10")).unwrap();
    let debt = debts::get(&conn, 1, id).unwrap();
    assert_eq!(debt.remaining_amount, Decimal::ZERO);
    assert_eq!(debt.status, DebtStatus::Paid);

    // Nothing left to pay against; any positive amount must be refused.
    assert!(debts::apply_payment(&mut conn, 1, id, &payment("1", "2024-03-11")).is_err());
}

#[test]
fn overpayment_is_rejected_and_leaves_the_debt_untouched() {
    let mut conn = setup();
    let id = debts::create(&mut conn, 1, &new_debt("1000000", DebtKind::Debt)).unwrap();
    debts::apply_payment(&mut conn, 1, id, &payment("400000", "2024-03-01")).unwrap();

    let err = debts::apply_payment(&mut conn, 1, id, &payment("700000", "2024-03-02"))
        .unwrap_err();
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::PaymentExceedsRemaining { max }) => assert_eq!(*max, d("600000")),
        other => panic!("unexpected error: {:?}", other),
    }

    let debt = debts::get(&conn, 1, id).unwrap();
    assert_eq!(debt.remaining_amount, d("600000"));
    assert_eq!(debt.status, DebtStatus::Partial);
    assert_eq!(debts::payments(&conn, 1, id).unwrap().len(), 1);
}

#[test]
fn non_positive_payments_are_rejected() {
    let mut conn = setup();
    let id = debts::create(&mut conn, 1, &new_debt("1000", DebtKind::Debt)).unwrap();
    assert!(debts::apply_payment(&mut conn, 1, id, &payment("0", "2024-03-01")).is_err());
    assert!(debts::apply_payment(&mut conn, 1, id, &payment("-10", "2024-03-01")).is_err());
    let debt = debts::get(&conn, 1, id).unwrap();
    assert_eq!(debt.status, DebtStatus::Pending);
}

#[test]
fn payments_are_an_append_only_trail() {
    let mut conn = setup();
    let id = debts::create(&mut conn, 1, &new_debt("500", DebtKind::Receivable)).unwrap();
    debts::apply_payment(&mut conn, 1, id, &payment("100", "2024-03-05")).unwrap();
    debts::apply_payment(&mut conn, 1, id, &payment("150", "2024-03-01")).unwrap();

    let trail = debts::payments(&conn, 1, id).unwrap();
    assert_eq!(trail.len(), 2);
    // Ordered by payment date, not insertion order.
    assert_eq!(trail[0].amount, d("150"));
    assert_eq!(trail[1].amount, d("100"));
}

#[test]
fn deleting_a_debt_cascades_to_payments() {
    let mut conn = setup();
    let id = debts::create(&mut conn, 1, &new_debt("500", DebtKind::Debt)).unwrap();
    debts::apply_payment(&mut conn, 1, id, &payment("100", "2024-03-05")).unwrap();

    debts::delete(&conn, 1, id).unwrap();
    let left: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM debt_payments WHERE debt_id=?1",
            [id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(left, 0);
}

fn mk_debt(
    kind: DebtKind,
    amount: &str,
    remaining: &str,
    status: DebtStatus,
    due: Option<&str>,
) -> Debt {
    Debt {
        id: 0,
        user_id: 1,
        counterparty: "Budi".into(),
        amount: d(amount),
        remaining_amount: d(remaining),
        description: "Pinjaman".into(),
        due_date: due.map(day),
        status,
        kind,
        interest_rate: Decimal::ZERO,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn summary_buckets_use_principal_for_paid_and_balance_for_pending() {
    let today = day("2024-03-15");
    let debts = vec![
        mk_debt(DebtKind::Debt, "1000", "600", DebtStatus::Partial, None),
        mk_debt(DebtKind::Debt, "500", "0", DebtStatus::Paid, None),
        mk_debt(DebtKind::Receivable, "2000", "2000", DebtStatus::Pending, None),
    ];
    let s: DebtSummary = debt::summarize(&debts, today);
    assert_eq!(s.total_debts, d("1500"));
    assert_eq!(s.total_receivables, d("2000"));
    assert_eq!(s.pending_debts, d("600"));
    assert_eq!(s.pending_receivables, d("2000"));
    assert_eq!(s.paid_debts, d("500"));
    assert_eq!(s.paid_receivables, Decimal::ZERO);
}

#[test]
fn overdue_needs_a_past_due_date_and_an_open_balance() {
    let today = day("2024-03-15");

    let open_overdue = vec![mk_debt(
        DebtKind::Debt,
        "1000",
        "600",
        DebtStatus::Partial,
        Some("2024-03-14"),
    )];
    assert_eq!(debt::summarize(&open_overdue, today).overdue_debts, d("600"));

    // Same dates, already paid: excluded no matter the due date.
    let paid = vec![mk_debt(
        DebtKind::Debt,
        "1000",
        "0",
        DebtStatus::Paid,
        Some("2024-03-14"),
    )];
    assert_eq!(debt::summarize(&paid, today).overdue_debts, Decimal::ZERO);

    // Due today is not overdue; strictly-before comparison.
    let due_today = vec![mk_debt(
        DebtKind::Debt,
        "1000",
        "1000",
        DebtStatus::Pending,
        Some("2024-03-15"),
    )];
    assert_eq!(debt::summarize(&due_today, today).overdue_debts, Decimal::ZERO);
}

#[test]
fn core_transition_marks_paid_only_at_zero() {
    let (rem, status) = debt::apply_payment(d("100"), d("40")).unwrap();
    assert_eq!(rem, d("60"));
    assert_eq!(status, DebtStatus::Partial);

    let (rem, status) = debt::apply_payment(d("60"), d("60")).unwrap();
    assert_eq!(rem, Decimal::ZERO);
    assert_eq!(status, DebtStatus::Paid);

    assert!(debt::apply_payment(d("60"), d("61")).is_err());
}
