//! Storage layer for Cashbook
//!
//! Provides JSON file storage with atomic writes, automatic directory
//! creation and audit logging of every mutation.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod transactions;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::CashbookPaths;
use crate::error::{CashbookError, CashbookResult};
use crate::models::{AccountId, CategoryId};

/// Next ID after the repository's high-water mark. Deleted IDs are never
/// handed out again. Call while holding the repository's write lock.
pub(crate) fn claim_id(last_id: &AtomicU64) -> u64 {
    last_id.fetch_add(1, Ordering::AcqRel) + 1
}

/// Raise the high-water mark to at least `seen`
pub(crate) fn observe_id(last_id: &AtomicU64, seen: u64) {
    last_id.fetch_max(seen, Ordering::AcqRel);
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> CashbookResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| CashbookError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> CashbookResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| CashbookError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CashbookPaths,
    pub accounts: AccountRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Create a new Storage instance, creating the data directory if needed
    pub fn new(paths: CashbookPaths) -> CashbookResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn paths(&self) -> &CashbookPaths {
        &self.paths
    }

    pub fn audit_logger(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> CashbookResult<()> {
        self.accounts.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> CashbookResult<()> {
        self.accounts.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// Append an entry to the audit log, if enabled
    pub fn log_entry(&self, entry: AuditEntry) -> CashbookResult<()> {
        self.log_entries(std::slice::from_ref(&entry))
    }

    /// Append several entries with one write, if enabled
    pub fn log_entries(&self, entries: &[AuditEntry]) -> CashbookResult<()> {
        if !self.audit_enabled {
            return Ok(());
        }
        self.audit.log_batch(entries)
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> CashbookResult<()> {
        self.log_entry(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> CashbookResult<()> {
        self.log_entry(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> CashbookResult<()> {
        self.log_entry(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Remove an account together with its categories and transactions.
    ///
    /// Transactions of other accounts that still reference one of the
    /// removed categories (after a move) become uncategorized. Returns
    /// `(categories_removed, transactions_removed)`. Nothing is written to
    /// disk; callers save afterwards.
    pub fn delete_account(&self, account_id: AccountId) -> CashbookResult<(usize, usize)> {
        if !self.accounts.delete(account_id)? {
            return Err(CashbookError::account_not_found(account_id.to_string()));
        }
        let categories = self.categories.delete_by_account(account_id)?;
        let transactions = self.transactions.delete_by_account(account_id)?;
        for category_id in &categories {
            self.transactions.clear_category(*category_id)?;
        }
        Ok((categories.len(), transactions))
    }

    /// Remove a category and detach it from its transactions.
    ///
    /// Returns the number of transactions that became uncategorized.
    pub fn delete_category(&self, category_id: CategoryId) -> CashbookResult<usize> {
        if !self.categories.delete(category_id)? {
            return Err(CashbookError::category_not_found(category_id.to_string()));
        }
        self.transactions.clear_category(category_id)
    }
}
