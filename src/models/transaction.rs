//! Transaction model
//!
//! A dated cash movement under an account. The time of day is a separate
//! free-form string and is never combined with the date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::amount::Amount;
use super::ids::{AccountId, CategoryId, TransactionId};

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identifier
    pub id: TransactionId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// Category, `None` if uncategorized or the category was deleted
    pub category_id: Option<CategoryId>,

    /// Calendar date
    pub date: NaiveDate,

    /// Time of day as entered (e.g. `"10:00"`), may be empty
    #[serde(default)]
    pub time: String,

    /// Free-text remark
    #[serde(default)]
    pub remark: String,

    /// Payment mode (cash, card, ...)
    #[serde(default)]
    pub mode: String,

    /// Money received
    #[serde(default)]
    pub cash_in: Amount,

    /// Money spent
    #[serde(default)]
    pub cash_out: Amount,
}

impl Transaction {
    /// Create a new, not yet inserted transaction with zero amounts
    pub fn new(account_id: AccountId, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::UNASSIGNED,
            account_id,
            category_id: None,
            date,
            time: String::new(),
            remark: String::new(),
            mode: String::new(),
            cash_in: Amount::ZERO,
            cash_out: Amount::ZERO,
        }
    }

    /// Create a transaction with all common fields
    #[allow(clippy::too_many_arguments)]
    pub fn with_details(
        account_id: AccountId,
        category_id: Option<CategoryId>,
        date: NaiveDate,
        time: impl Into<String>,
        remark: impl Into<String>,
        mode: impl Into<String>,
        cash_in: Amount,
        cash_out: Amount,
    ) -> Self {
        Self {
            id: TransactionId::UNASSIGNED,
            account_id,
            category_id,
            date,
            time: time.into(),
            remark: remark.into(),
            mode: mode.into(),
            cash_in,
            cash_out,
        }
    }

    /// Contribution of this transaction to the account balance
    pub fn balance(&self) -> Amount {
        self.cash_in - self.cash_out
    }

    pub fn is_categorized(&self) -> bool {
        self.category_id.is_some()
    }

    /// Store ordering: date descending, then time string descending, then
    /// newest ID first
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| other.time.cmp(&self.time))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (+{} / -{})",
            self.date.format("%Y-%m-%d"),
            self.time,
            self.remark,
            self.cash_in,
            self.cash_out
        )
    }
}
