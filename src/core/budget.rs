// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::core::aggregate::{self, TxFilter};
use crate::models::{Budget, BudgetPeriod, Transaction, TransactionType};
use crate::utils::{start_of_month, start_of_year};

pub const NEAR_LIMIT_PCT: u32 = 80;
pub const EXCEEDED_PCT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Safe,
    NearLimit,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::NearLimit => "near-limit",
            BudgetStatus::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Unclamped, so values above 100 keep the overshoot visible; display
    /// layers clamp the bar, not the number.
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

/// Budgets have no stored start date; the window is always the current
/// period relative to `today`.
pub fn period_start(period: BudgetPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        BudgetPeriod::Monthly => start_of_month(today),
        BudgetPeriod::Yearly => start_of_year(today),
    }
}

pub fn evaluate(budget: &Budget, transactions: &[Transaction], today: NaiveDate) -> BudgetReport {
    let spent = aggregate::sum(
        transactions,
        &TxFilter {
            kind: Some(TransactionType::Expense),
            category: Some(&budget.category),
            date_from: Some(period_start(budget.period, today)),
            date_to: None,
        },
    );
    let remaining = (budget.amount - spent).max(Decimal::ZERO);
    let percentage = if budget.amount > Decimal::ZERO {
        spent / budget.amount * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let status = if percentage >= Decimal::from(EXCEEDED_PCT) {
        BudgetStatus::Exceeded
    } else if percentage >= Decimal::from(NEAR_LIMIT_PCT) {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::Safe
    };
    BudgetReport {
        spent,
        remaining,
        percentage,
        status,
    }
}
