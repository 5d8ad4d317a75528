//! Account service
//!
//! Provides business logic for account management including CRUD operations,
//! balance calculation, and validation.

use crate::audit::{AuditEntry, EntityType};
use crate::error::{CashbookError, CashbookResult};
use crate::models::{Account, AccountId, Amount};
use crate::storage::Storage;

use super::balance::compute_balance;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// Summary of an account with computed fields
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Cash in minus cash out over all transactions
    pub balance: Amount,
    pub transaction_count: usize,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(&self, name: &str) -> CashbookResult<Account> {
        let account = Account::new(name.trim());
        account
            .validate()
            .map_err(|e| CashbookError::Validation(e.to_string()))?;

        let account = self.storage.accounts.insert(account)?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> CashbookResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name or ID string
    pub fn find(&self, identifier: &str) -> CashbookResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(None)
    }

    /// Like `find`, but a missing account is an error
    pub fn require(&self, identifier: &str) -> CashbookResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| CashbookError::account_not_found(identifier))
    }

    /// All accounts ordered by name
    pub fn list(&self) -> CashbookResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// All accounts with their balances
    pub fn list_with_balances(&self) -> CashbookResult<Vec<AccountSummary>> {
        let accounts = self.list()?;
        let mut summaries = Vec::with_capacity(accounts.len());

        for account in accounts {
            summaries.push(self.get_summary(&account)?);
        }

        Ok(summaries)
    }

    pub fn get_summary(&self, account: &Account) -> CashbookResult<AccountSummary> {
        let transactions = self.storage.transactions.get_by_account(account.id)?;

        Ok(AccountSummary {
            account: account.clone(),
            balance: compute_balance(&transactions),
            transaction_count: transactions.len(),
        })
    }

    /// Rename an account
    pub fn rename(&self, id: AccountId, name: &str) -> CashbookResult<Account> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| CashbookError::account_not_found(id.to_string()))?;

        let before = account.clone();
        account.name = name.trim().to_string();
        account
            .validate()
            .map_err(|e| CashbookError::Validation(e.to_string()))?;

        self.storage.accounts.update(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Delete an account with all of its categories and transactions
    pub fn delete(&self, id: AccountId) -> CashbookResult<Account> {
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| CashbookError::account_not_found(id.to_string()))?;

        let (categories, transactions) = self.storage.delete_account(id)?;
        self.storage.save_all()?;

        tracing::info!(
            "Deleted account {} with {} categories and {} transactions",
            account.id,
            categories,
            transactions
        );

        self.storage.log_entry(
            AuditEntry::delete(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )
            .with_note(format!(
                "cascade: {} categories, {} transactions",
                categories, transactions
            )),
        )?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashbookPaths;
    use crate::models::{Category, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service.create("  Wallet ").unwrap();
        assert_eq!(account.name, "Wallet");
        assert!(account.id.is_assigned());
        assert_eq!(storage.audit_logger().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_empty_name_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let err = service.create("   ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service.create("Bank").unwrap();

        assert_eq!(service.find("Bank").unwrap().unwrap().id, account.id);
        assert_eq!(
            service.find(&account.id.to_string()).unwrap().unwrap().id,
            account.id
        );
        assert!(service.find("Nope").unwrap().is_none());
        assert!(service.require("Nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service.create("Wallet").unwrap();
        service.create("Bank").unwrap();

        let names: Vec<_> = service.list().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Bank", "Wallet"]);
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service.create("Old").unwrap();

        let renamed = service.rename(account.id, "New").unwrap();
        assert_eq!(renamed.name, "New");
        assert!(service.rename(account.id, "").unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service.create("Wallet").unwrap();
        storage
            .categories
            .insert(Category::new(account.id, "Food"))
            .unwrap();
        storage
            .transactions
            .insert(Transaction::new(
                account.id,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ))
            .unwrap();

        service.delete(account.id).unwrap();
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert!(service.delete(account.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_summary_balance() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service.create("Wallet").unwrap();

        let mut txn = Transaction::new(account.id, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        txn.cash_in = Amount::new(100.0);
        txn.cash_out = Amount::new(25.5);
        storage.transactions.insert(txn).unwrap();

        let summary = service.get_summary(&account).unwrap();
        assert_eq!(summary.balance, Amount::new(74.5));
        assert_eq!(summary.transaction_count, 1);
    }
}
