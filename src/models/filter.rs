//! Filter criteria for transaction lists
//!
//! The set of independently toggleable search criteria applied to one
//! account's transaction list. `None` disables a criterion; an empty remark
//! or mode string disables it as well.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::ids::CategoryId;

/// Active filter criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Keep transactions in this category
    pub category: Option<CategoryId>,

    /// Keep transactions strictly after this date
    pub date_after: Option<NaiveDate>,

    /// Keep transactions strictly before this date
    pub date_before: Option<NaiveDate>,

    /// Case-insensitive substring of the remark
    pub remark: Option<String>,

    /// Exact match against cash-in or cash-out
    pub amount: Option<Amount>,

    /// Case-insensitive exact match of the payment mode
    pub mode: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_category(&mut self, category: Option<CategoryId>) {
        self.category = category;
    }

    /// Set both date bounds at once
    pub fn set_date_range(&mut self, after: Option<NaiveDate>, before: Option<NaiveDate>) {
        self.date_after = after;
        self.date_before = before;
    }

    pub fn set_remark(&mut self, remark: Option<String>) {
        self.remark = remark;
    }

    pub fn set_amount(&mut self, amount: Option<Amount>) {
        self.amount = amount;
    }

    pub fn set_mode(&mut self, mode: Option<String>) {
        self.mode = mode;
    }

    /// Reset every criterion
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Remark criterion, if enabled
    pub fn active_remark(&self) -> Option<&str> {
        self.remark.as_deref().filter(|r| !r.is_empty())
    }

    /// Mode criterion, if enabled
    pub fn active_mode(&self) -> Option<&str> {
        self.mode.as_deref().filter(|m| !m.is_empty())
    }

    /// Whether any criterion is enabled
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.date_after.is_some()
            || self.date_before.is_some()
            || self.active_remark().is_some()
            || self.amount.is_some()
            || self.active_mode().is_some()
    }

    // Builder-style helpers

    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn after(mut self, date: NaiveDate) -> Self {
        self.date_after = Some(date);
        self
    }

    pub fn before(mut self, date: NaiveDate) -> Self {
        self.date_before = Some(date);
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }
}
