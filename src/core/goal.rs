// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::FinancialGoal;

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    /// Clamped to [0, 100]; overfunding a goal never reads past full.
    pub percentage: Decimal,
    /// Whole days until the deadline; negative once it has passed.
    pub days_remaining: i64,
    pub overdue: bool,
}

pub fn evaluate(goal: &FinancialGoal, today: NaiveDate) -> GoalProgress {
    // target_amount > 0 is enforced at creation; guard anyway.
    let percentage = if goal.target_amount > Decimal::ZERO {
        (goal.current_amount / goal.target_amount * Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    let days_remaining = (goal.deadline - today).num_days();
    GoalProgress {
        percentage,
        days_remaining,
        overdue: days_remaining < 0,
    }
}
