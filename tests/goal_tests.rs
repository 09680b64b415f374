// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::core::goal;
use dompet::models::{FinancialGoal, GoalPriority};
use dompet::store::goals::{self, GoalPatch, NewGoal};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn mk_goal(target: &str, current: &str, deadline: &str) -> FinancialGoal {
    FinancialGoal {
        id: 1,
        user_id: 1,
        title: "Dana Darurat".into(),
        target_amount: d(target),
        current_amount: d(current),
        deadline: day(deadline),
        category: "Tabungan".into(),
        priority: GoalPriority::High,
        created_at: String::new(),
        updated_at: String::new(),
    }
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

fn new_goal(target: &str, current: &str, deadline: &str) -> NewGoal {
    NewGoal {
        title: "Dana Darurat".into(),
        target_amount: d(target),
        current_amount: d(current),
        deadline: day(deadline),
        category: "Tabungan".into(),
        priority: GoalPriority::High,
    }
}

#[test]
fn progress_is_clamped_to_100() {
    let g = mk_goal("1000000", "1500000", "2030-01-01");
    let p = goal::evaluate(&g, day("2024-03-15"));
    assert_eq!(p.percentage, Decimal::ONE_HUNDRED);
}

#[test]
fn progress_never_decreases_as_savings_grow() {
    let today = day("2024-03-15");
    let mut last = Decimal::ZERO;
    for current in ["0", "250000", "500000", "999999", "1000000", "2000000"] {
        let g = mk_goal("1000000", current, "2030-01-01");
        let p = goal::evaluate(&g, today);
        assert!(p.percentage >= last, "progress dropped at current={}", current);
        assert!(p.percentage >= Decimal::ZERO && p.percentage <= Decimal::ONE_HUNDRED);
        last = p.percentage;
    }
}

#[test]
fn zero_target_reads_as_zero_progress() {
    let g = mk_goal("0", "500", "2030-01-01");
    assert_eq!(goal::evaluate(&g, day("2024-03-15")).percentage, Decimal::ZERO);
}

#[test]
fn days_remaining_counts_whole_days() {
    let today = day("2024-03-15");
    let due_tomorrow = mk_goal("100", "0", "2024-03-16");
    let p = goal::evaluate(&due_tomorrow, today);
    assert_eq!(p.days_remaining, 1);
    assert!(!p.overdue);

    let due_today = mk_goal("100", "0", "2024-03-15");
    let p = goal::evaluate(&due_today, today);
    assert_eq!(p.days_remaining, 0);
    assert!(!p.overdue);

    let missed = mk_goal("100", "0", "2024-03-14");
    let p = goal::evaluate(&missed, today);
    assert_eq!(p.days_remaining, -1);
    assert!(p.overdue);
}

#[test]
fn creation_rejects_past_deadline() {
    let conn = setup();
    let err = goals::create(&conn, 1, &new_goal("1000", "0", "2024-01-01"), day("2024-03-15"))
        .unwrap_err();
    assert!(err.to_string().contains("past"), "unexpected error: {}", err);
}

#[test]
fn creation_rejects_current_above_target() {
    let conn = setup();
    assert!(
        goals::create(&conn, 1, &new_goal("1000", "2000", "2030-01-01"), day("2024-03-15"))
            .is_err()
    );
}

#[test]
fn later_updates_may_push_current_past_target() {
    // The ceiling check applies at creation only; afterwards progress just
    // clamps at 100.
    let mut conn = setup();
    let id = goals::create(
        &conn,
        1,
        &new_goal("1000", "900", "2030-01-01"),
        day("2024-03-15"),
    )
    .unwrap();

    goals::update(
        &conn,
        1,
        id,
        &GoalPatch {
            current_amount: Some(d("5000")),
            ..Default::default()
        },
    )
    .unwrap();
    let g = goals::get(&conn, 1, id).unwrap();
    assert_eq!(g.current_amount, d("5000"));
    assert_eq!(
        goal::evaluate(&g, day("2024-03-15")).percentage,
        Decimal::ONE_HUNDRED
    );

    let new_current = goals::fund(&mut conn, 1, id, d("100")).unwrap();
    assert_eq!(new_current, d("5100"));
}

#[test]
fn funding_rejects_non_positive_amounts() {
    let mut conn = setup();
    let id = goals::create(
        &conn,
        1,
        &new_goal("1000", "0", "2030-01-01"),
        day("2024-03-15"),
    )
    .unwrap();
    assert!(goals::fund(&mut conn, 1, id, Decimal::ZERO).is_err());
    assert!(goals::fund(&mut conn, 1, id, d("-5")).is_err());
}
