// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionType};

/// Filter over an in-memory transaction collection. Date bounds are
/// inclusive; an absent bound leaves that side of the window open.
#[derive(Debug, Default, Clone)]
pub struct TxFilter<'a> {
    pub kind: Option<TransactionType>,
    pub category: Option<&'a str>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl TxFilter<'_> {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }
        if let Some(cat) = self.category {
            if tx.category != cat {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if tx.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if tx.date > to {
                return false;
            }
        }
        true
    }
}

/// Sum the amounts of all transactions matching `filter`. An empty
/// collection or a filter nothing matches yields zero.
pub fn sum(transactions: &[Transaction], filter: &TxFilter) -> Decimal {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .map(|tx| tx.amount)
        .sum()
}
