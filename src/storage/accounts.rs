//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::CashbookError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};
use super::{claim_id, observe_id, read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    /// Highest ID ever assigned, kept so deleted IDs are not reused
    #[serde(default)]
    last_id: u64,
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
    last_id: AtomicU64,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            last_id: AtomicU64::new(0),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), CashbookError> {
        let file_data: AccountData = read_json(&self.path)?;
        let mut data = write_lock(&self.data)?;

        data.clear();
        self.last_id.store(file_data.last_id, Ordering::Release);
        for account in file_data.accounts {
            observe_id(&self.last_id, account.id.value());
            data.insert(account.id, account);
        }

        tracing::debug!("Loaded {} accounts from {}", data.len(), self.path.display());
        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), CashbookError> {
        let data = read_lock(&self.data)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);

        write_json_atomic(
            &self.path,
            &AccountData {
                last_id: self.last_id.load(Ordering::Acquire),
                accounts,
            },
        )
    }

    pub fn get(&self, id: AccountId) -> Result<Option<Account>, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// All accounts ordered by name ascending
    pub fn get_all(&self) -> Result<Vec<Account>, CashbookError> {
        let data = read_lock(&self.data)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(accounts)
    }

    /// First account with this exact name (lowest ID wins)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .filter(|a| a.name == name)
            .min_by_key(|a| a.id)
            .cloned())
    }

    /// Insert a new account, assigning its ID
    pub fn insert(&self, mut account: Account) -> Result<Account, CashbookError> {
        let mut data = write_lock(&self.data)?;

        account.id = AccountId::new(claim_id(&self.last_id));
        data.insert(account.id, account.clone());
        Ok(account)
    }

    /// Replace an existing account
    pub fn update(&self, account: Account) -> Result<(), CashbookError> {
        let mut data = write_lock(&self.data)?;

        if !data.contains_key(&account.id) {
            return Err(CashbookError::account_not_found(account.id.to_string()));
        }
        data.insert(account.id, account);
        Ok(())
    }

    /// Delete an account, returning whether it existed
    pub fn delete(&self, id: AccountId) -> Result<bool, CashbookError> {
        let mut data = write_lock(&self.data)?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.len())
    }
}
