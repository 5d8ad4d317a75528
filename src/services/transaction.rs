//! Transaction service
//!
//! Provides business logic for transaction management: CRUD, moving a
//! transaction between accounts, and filtered listings with their balance.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{CashbookError, CashbookResult};
use crate::models::{AccountId, Amount, CategoryId, FilterSpec, Transaction, TransactionId};
use crate::storage::Storage;

use super::filter::TransactionView;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub date: NaiveDate,
    pub time: String,
    pub remark: String,
    pub mode: String,
    pub cash_in: Amount,
    pub cash_out: Amount,
}

impl CreateTransactionInput {
    /// Input with empty text fields and zero amounts
    pub fn new(account_id: AccountId, date: NaiveDate) -> Self {
        Self {
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
}

/// Input for updating a transaction. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub remark: Option<String>,
    pub mode: Option<String>,
    pub cash_in: Option<Amount>,
    pub cash_out: Option<Amount>,
    /// `Some(None)` removes the category
    pub category_id: Option<Option<CategoryId>>,
}

/// A filtered transaction list with its balance
#[derive(Debug, Clone)]
pub struct FilteredTransactions {
    pub transactions: Vec<Transaction>,
    pub balance: Amount,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ensure_account(&self, account_id: AccountId) -> CashbookResult<()> {
        if self.storage.accounts.get(account_id)?.is_none() {
            return Err(CashbookError::account_not_found(account_id.to_string()));
        }
        Ok(())
    }

    fn ensure_category(&self, account_id: AccountId, category_id: CategoryId) -> CashbookResult<()> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| CashbookError::category_not_found(category_id.to_string()))?;

        if category.account_id != account_id {
            return Err(CashbookError::Validation(format!(
                "Category {} does not belong to account {}",
                category_id, account_id
            )));
        }
        Ok(())
    }

    fn require(&self, id: TransactionId) -> CashbookResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| CashbookError::transaction_not_found(id.to_string()))
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> CashbookResult<Transaction> {
        self.ensure_account(input.account_id)?;
        if let Some(category_id) = input.category_id {
            self.ensure_category(input.account_id, category_id)?;
        }

        let txn = Transaction::with_details(
            input.account_id,
            input.category_id,
            input.date,
            input.time,
            input.remark,
            input.mode,
            input.cash_in,
            input.cash_out,
        );

        let txn = self.storage.transactions.insert(txn)?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.remark.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> CashbookResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Update fields of a transaction
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> CashbookResult<Transaction> {
        let mut txn = self.require(id)?;
        let before = txn.clone();

        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(time) = input.time {
            txn.time = time;
        }
        if let Some(remark) = input.remark {
            txn.remark = remark;
        }
        if let Some(mode) = input.mode {
            txn.mode = mode;
        }
        if let Some(cash_in) = input.cash_in {
            txn.cash_in = cash_in;
        }
        if let Some(cash_out) = input.cash_out {
            txn.cash_out = cash_out;
        }
        if let Some(category_id) = input.category_id {
            if let Some(category_id) = category_id {
                self.ensure_category(txn.account_id, category_id)?;
            }
            txn.category_id = category_id;
        }

        if txn == before {
            return Ok(txn);
        }

        self.storage.transactions.update(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.remark.clone()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> CashbookResult<Transaction> {
        let txn = self.require(id)?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.remark.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Move a transaction to another account.
    ///
    /// The category reference is carried over unchanged, even though it
    /// belongs to the source account.
    pub fn move_to_account(
        &self,
        id: TransactionId,
        target: AccountId,
    ) -> CashbookResult<Transaction> {
        let mut txn = self.require(id)?;
        self.ensure_account(target)?;

        if txn.account_id == target {
            return Ok(txn);
        }

        let before = txn.clone();
        txn.account_id = target;

        self.storage.transactions.update(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_entry(
            AuditEntry::update(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.remark.clone()),
                &before,
                &txn,
            )
            .with_note(format!("moved {} -> {}", before.account_id, target)),
        )?;

        Ok(txn)
    }

    /// Transactions of an account, newest first
    pub fn list_for_account(&self, account_id: AccountId) -> CashbookResult<Vec<Transaction>> {
        self.storage.transactions.get_by_account(account_id)
    }

    /// Transactions of an account that pass `filter`, with their balance
    pub fn list_filtered(
        &self,
        account_id: AccountId,
        filter: &FilterSpec,
    ) -> CashbookResult<FilteredTransactions> {
        let mut view = TransactionView::with_filter(account_id, filter.clone());
        view.refresh(self.storage)?;

        Ok(FilteredTransactions {
            transactions: view.transactions().to_vec(),
            balance: view.balance(),
        })
    }
}
