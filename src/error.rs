// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Domain failures surfaced to the user as a single message. Store and core
/// functions return these; command handlers bubble them through anyhow.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Rejected before any write: missing field, bad enum, non-positive
    /// amount, past deadline.
    #[error("{0}")]
    Validation(String),

    /// The row does not exist or belongs to another user; the store does not
    /// distinguish the two cases.
    #[error("{what} {id} not found for this user")]
    NotFound { what: &'static str, id: i64 },

    #[error("A {period} budget for '{category}' already exists")]
    DuplicateBudget { category: String, period: String },

    #[error("Payment exceeds remaining balance; maximum allowed is {max}")]
    PaymentExceedsRemaining { max: Decimal },

    /// A concurrent writer changed the row between read and write.
    #[error("{0}")]
    Conflict(String),
}
