//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. Every
//! mutation bumps a revision counter; views poll it to know when to
//! recompute.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::CashbookError;
use crate::models::{AccountId, CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::{claim_id, observe_id, read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    /// Highest ID ever assigned, kept so deleted IDs are not reused
    #[serde(default)]
    last_id: u64,
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    last_id: AtomicU64,
    revision: AtomicU64,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            last_id: AtomicU64::new(0),
            revision: AtomicU64::new(0),
        }
    }

    /// Current change revision
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), CashbookError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut data = write_lock(&self.data)?;

        data.clear();
        self.last_id.store(file_data.last_id, Ordering::Release);
        for txn in file_data.transactions {
            observe_id(&self.last_id, txn.id.value());
            data.insert(txn.id, txn);
        }
        self.bump();

        tracing::debug!("Loaded {} transactions from {}", data.len(), self.path.display());
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), CashbookError> {
        let data = read_lock(&self.data)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(Transaction::cmp_newest_first);

        write_json_atomic(
            &self.path,
            &TransactionData {
                last_id: self.last_id.load(Ordering::Acquire),
                transactions,
            },
        )
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Transactions of one account: date descending, then time descending
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, CashbookError> {
        let data = read_lock(&self.data)?;

        let mut transactions: Vec<_> = data
            .values()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        transactions.sort_by(Transaction::cmp_newest_first);
        Ok(transactions)
    }

    /// Insert a new transaction, assigning its ID
    pub fn insert(&self, mut txn: Transaction) -> Result<Transaction, CashbookError> {
        let mut data = write_lock(&self.data)?;

        txn.id = TransactionId::new(claim_id(&self.last_id));
        data.insert(txn.id, txn.clone());
        self.bump();
        Ok(txn)
    }

    /// Replace an existing transaction
    pub fn update(&self, txn: Transaction) -> Result<(), CashbookError> {
        let mut data = write_lock(&self.data)?;

        if !data.contains_key(&txn.id) {
            return Err(CashbookError::transaction_not_found(txn.id.to_string()));
        }
        data.insert(txn.id, txn);
        self.bump();
        Ok(())
    }

    /// Delete a transaction, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> Result<bool, CashbookError> {
        let mut data = write_lock(&self.data)?;

        let removed = data.remove(&id).is_some();
        if removed {
            self.bump();
        }
        Ok(removed)
    }

    /// Detach a deleted category from every transaction referencing it
    pub fn clear_category(&self, category_id: CategoryId) -> Result<usize, CashbookError> {
        let mut data = write_lock(&self.data)?;

        let mut cleared = 0;
        for txn in data.values_mut() {
            if txn.category_id == Some(category_id) {
                txn.category_id = None;
                cleared += 1;
            }
        }
        if cleared > 0 {
            self.bump();
        }
        Ok(cleared)
    }

    /// Delete every transaction of an account
    pub fn delete_by_account(&self, account_id: AccountId) -> Result<usize, CashbookError> {
        let mut data = write_lock(&self.data)?;

        let before = data.len();
        data.retain(|_, t| t.account_id != account_id);
        let removed = before - data.len();
        if removed > 0 {
            self.bump();
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.len())
    }
}
