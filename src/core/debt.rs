// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::DomainError;
use crate::models::{Debt, DebtKind, DebtStatus};

/// Compute the effect of applying `payment` to a balance of `remaining`.
/// The store wraps this in a transaction so the read and the write commit
/// together; this function holds only the business rule.
///
/// Status never reverts to pending: once any payment lands the debt is
/// partial until the balance reaches zero.
pub fn apply_payment(
    remaining: Decimal,
    payment: Decimal,
) -> Result<(Decimal, DebtStatus), DomainError> {
    if payment <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Payment amount must be greater than zero, got {}",
            payment
        )));
    }
    if payment > remaining {
        return Err(DomainError::PaymentExceedsRemaining { max: remaining });
    }
    let new_remaining = remaining - payment;
    let status = if new_remaining.is_zero() {
        DebtStatus::Paid
    } else {
        DebtStatus::Partial
    };
    Ok((new_remaining, status))
}

/// Per-type totals across a user's debts and receivables. Pending buckets
/// sum remaining balances, paid buckets sum original principal; one debt
/// never lands in both.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebtSummary {
    pub total_debts: Decimal,
    pub total_receivables: Decimal,
    pub pending_debts: Decimal,
    pub pending_receivables: Decimal,
    pub paid_debts: Decimal,
    pub paid_receivables: Decimal,
    pub overdue_debts: Decimal,
    pub overdue_receivables: Decimal,
}

pub fn summarize(debts: &[Debt], today: NaiveDate) -> DebtSummary {
    let mut s = DebtSummary::default();
    for d in debts {
        let (total, pending, paid, overdue) = match d.kind {
            DebtKind::Debt => (
                &mut s.total_debts,
                &mut s.pending_debts,
                &mut s.paid_debts,
                &mut s.overdue_debts,
            ),
            DebtKind::Receivable => (
                &mut s.total_receivables,
                &mut s.pending_receivables,
                &mut s.paid_receivables,
                &mut s.overdue_receivables,
            ),
        };
        *total += d.amount;
        if d.status == DebtStatus::Paid {
            *paid += d.amount;
        } else {
            *pending += d.remaining_amount;
            if d.due_date.is_some_and(|due| due < today) {
                *overdue += d.remaining_amount;
            }
        }
    }
    s
}
