//! Filter engine and live transaction view
//!
//! Filtering runs a fixed sequence of stages over one account's ordered
//! transaction list. Each stage is a predicate; a disabled stage passes its
//! input through. Output order always matches input order.
//!
//! `TransactionView` keeps a filtered view in sync with the store by polling
//! the transaction repository's revision counter.

use chrono::NaiveDate;

use crate::error::CashbookResult;
use crate::models::{AccountId, Amount, CategoryId, FilterSpec, Transaction};
use crate::storage::Storage;

use super::balance::compute_balance;

/// One stage of the filter pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Category,
    DateAfter,
    DateBefore,
    Remark,
    Amount,
    Mode,
}

impl FilterStage {
    /// Order in which stages are applied
    pub const ORDER: [FilterStage; 6] = [
        FilterStage::Category,
        FilterStage::DateAfter,
        FilterStage::DateBefore,
        FilterStage::Remark,
        FilterStage::Amount,
        FilterStage::Mode,
    ];

    /// Whether this stage has a criterion in `spec`
    pub fn is_enabled(self, spec: &FilterSpec) -> bool {
        match self {
            FilterStage::Category => spec.category.is_some(),
            FilterStage::DateAfter => spec.date_after.is_some(),
            FilterStage::DateBefore => spec.date_before.is_some(),
            FilterStage::Remark => spec.active_remark().is_some(),
            FilterStage::Amount => spec.amount.is_some(),
            FilterStage::Mode => spec.active_mode().is_some(),
        }
    }

    /// Whether `txn` passes this stage. Disabled stages accept everything.
    pub fn matches(self, spec: &FilterSpec, txn: &Transaction) -> bool {
        match self {
            FilterStage::Category => spec
                .category
                .map_or(true, |c| txn.category_id == Some(c)),
            FilterStage::DateAfter => spec.date_after.map_or(true, |d| txn.date > d),
            FilterStage::DateBefore => spec.date_before.map_or(true, |d| txn.date < d),
            FilterStage::Remark => spec.active_remark().map_or(true, |needle| {
                txn.remark.to_lowercase().contains(&needle.to_lowercase())
            }),
            FilterStage::Amount => spec
                .amount
                .map_or(true, |v| txn.cash_in == v || txn.cash_out == v),
            FilterStage::Mode => spec
                .active_mode()
                .map_or(true, |m| txn.mode.to_lowercase() == m.to_lowercase()),
        }
    }

    /// Narrow `input` by this stage
    pub fn apply(self, spec: &FilterSpec, input: Vec<Transaction>) -> Vec<Transaction> {
        if !self.is_enabled(spec) {
            return input;
        }
        input
            .into_iter()
            .filter(|t| self.matches(spec, t))
            .collect()
    }
}

/// Apply every enabled stage of `spec` to `all`, in `FilterStage::ORDER`
pub fn compute_filtered_view(all: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    FilterStage::ORDER
        .iter()
        .fold(all.to_vec(), |acc, stage| stage.apply(spec, acc))
}

/// A filtered, balanced view over one account's transactions
#[derive(Debug, Clone)]
pub struct TransactionView {
    account_id: AccountId,
    filter: FilterSpec,
    all: Vec<Transaction>,
    visible: Vec<Transaction>,
    balance: Amount,
    seen_revision: Option<u64>,
}

impl TransactionView {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            filter: FilterSpec::default(),
            all: Vec::new(),
            visible: Vec::new(),
            balance: Amount::ZERO,
            seen_revision: None,
        }
    }

    /// Start with a filter already in place
    pub fn with_filter(account_id: AccountId, filter: FilterSpec) -> Self {
        let mut view = Self::new(account_id);
        view.filter = filter;
        view
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Pull the account's transactions if the store changed since the last
    /// refresh. Returns whether anything was reloaded.
    pub fn refresh(&mut self, storage: &Storage) -> CashbookResult<bool> {
        let revision = storage.transactions.revision();
        if self.seen_revision == Some(revision) {
            return Ok(false);
        }

        self.all = storage.transactions.get_by_account(self.account_id)?;
        self.seen_revision = Some(revision);
        self.recompute();
        Ok(true)
    }

    /// Replace the underlying data directly
    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        self.all = transactions;
        self.seen_revision = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = compute_filtered_view(&self.all, &self.filter);
        self.balance = compute_balance(&self.visible);
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.recompute();
    }

    pub fn set_category(&mut self, category: Option<CategoryId>) {
        self.filter.set_category(category);
        self.recompute();
    }

    pub fn set_date_range(&mut self, after: Option<NaiveDate>, before: Option<NaiveDate>) {
        self.filter.set_date_range(after, before);
        self.recompute();
    }

    pub fn set_remark(&mut self, remark: Option<String>) {
        self.filter.set_remark(remark);
        self.recompute();
    }

    pub fn set_amount(&mut self, amount: Option<Amount>) {
        self.filter.set_amount(amount);
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: Option<String>) {
        self.filter.set_mode(mode);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.recompute();
    }

    /// Visible (filtered) transactions
    pub fn transactions(&self) -> &[Transaction] {
        &self.visible
    }

    /// Every transaction of the account, unfiltered
    pub fn all_transactions(&self) -> &[Transaction] {
        &self.all
    }

    /// Balance of the visible transactions
    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }
}
