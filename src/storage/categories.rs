//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Name lookups
//! are exact and case-sensitive, scoped to one account.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::CashbookError;
use crate::models::{AccountId, Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::{claim_id, observe_id, read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    /// Highest ID ever assigned, kept so deleted IDs are not reused
    #[serde(default)]
    last_id: u64,
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
    last_id: AtomicU64,
}

fn by_name_then_id(a: &Category, b: &Category) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then(a.id.cmp(&b.id))
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            last_id: AtomicU64::new(0),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), CashbookError> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut data = write_lock(&self.data)?;

        data.clear();
        self.last_id.store(file_data.last_id, Ordering::Release);
        for category in file_data.categories {
            observe_id(&self.last_id, category.id.value());
            data.insert(category.id, category);
        }

        tracing::debug!("Loaded {} categories from {}", data.len(), self.path.display());
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), CashbookError> {
        let data = read_lock(&self.data)?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by_key(|c| c.id);

        write_json_atomic(
            &self.path,
            &CategoryData {
                last_id: self.last_id.load(Ordering::Acquire),
                categories,
            },
        )
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Categories of one account ordered by name ascending
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Category>, CashbookError> {
        let data = read_lock(&self.data)?;

        let mut list: Vec<_> = data
            .values()
            .filter(|c| c.account_id == account_id)
            .cloned()
            .collect();
        list.sort_by(by_name_then_id);
        Ok(list)
    }

    /// Exact, case-sensitive lookup by name within an account
    pub fn find_by_name(
        &self,
        account_id: AccountId,
        name: &str,
    ) -> Result<Option<Category>, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(find_in(&data, account_id, name).cloned())
    }

    /// Return the account's category with this name, creating it if needed.
    ///
    /// The lookup and the insert happen under one write lock, so concurrent
    /// callers sharing this repository never create duplicates. The flag is
    /// `true` when a new category was created.
    pub fn get_or_create(
        &self,
        account_id: AccountId,
        name: &str,
    ) -> Result<(Category, bool), CashbookError> {
        let mut data = write_lock(&self.data)?;

        if let Some(existing) = find_in(&data, account_id, name) {
            return Ok((existing.clone(), false));
        }

        let mut category = Category::new(account_id, name);
        category.id = CategoryId::new(claim_id(&self.last_id));
        data.insert(category.id, category.clone());
        Ok((category, true))
    }

    /// Insert a new category, assigning its ID
    pub fn insert(&self, mut category: Category) -> Result<Category, CashbookError> {
        let mut data = write_lock(&self.data)?;

        category.id = CategoryId::new(claim_id(&self.last_id));
        data.insert(category.id, category.clone());
        Ok(category)
    }

    /// Delete a category, returning whether it existed
    pub fn delete(&self, id: CategoryId) -> Result<bool, CashbookError> {
        let mut data = write_lock(&self.data)?;
        Ok(data.remove(&id).is_some())
    }

    /// Delete every category of an account, returning the removed IDs
    pub fn delete_by_account(&self, account_id: AccountId) -> Result<Vec<CategoryId>, CashbookError> {
        let mut data = write_lock(&self.data)?;

        let ids: Vec<_> = data
            .values()
            .filter(|c| c.account_id == account_id)
            .map(|c| c.id)
            .collect();
        for id in &ids {
            data.remove(id);
        }
        Ok(ids)
    }

    pub fn count(&self) -> Result<usize, CashbookError> {
        let data = read_lock(&self.data)?;
        Ok(data.len())
    }
}

// Lowest ID wins if duplicates were ever written by another tool
fn find_in<'a>(
    data: &'a HashMap<CategoryId, Category>,
    account_id: AccountId,
    name: &str,
) -> Option<&'a Category> {
    data.values()
        .filter(|c| c.account_id == account_id && c.name == name)
        .min_by_key(|c| c.id)
}
