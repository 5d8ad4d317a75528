//! Category service
//!
//! Category CRUD plus name resolution, the get-or-create lookup used when
//! importing transactions that name their category.

use crate::audit::{AuditEntry, EntityType};
use crate::error::{CashbookError, CashbookResult};
use crate::models::{AccountId, Category, CategoryId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ensure_account(&self, account_id: AccountId) -> CashbookResult<()> {
        if self.storage.accounts.get(account_id)?.is_none() {
            return Err(CashbookError::account_not_found(account_id.to_string()));
        }
        Ok(())
    }

    /// Create a new category in an account
    pub fn create(&self, account_id: AccountId, name: &str) -> CashbookResult<Category> {
        self.ensure_account(account_id)?;

        let category = Category::new(account_id, name.trim());
        category
            .validate()
            .map_err(|e| CashbookError::Validation(e.to_string()))?;

        if self
            .storage
            .categories
            .find_by_name(account_id, &category.name)?
            .is_some()
        {
            return Err(CashbookError::Validation(format!(
                "Category '{}' already exists in this account",
                category.name
            )));
        }

        let category = self.storage.categories.insert(category)?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> CashbookResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category of an account by exact name or ID string
    pub fn find(&self, account_id: AccountId, identifier: &str) -> CashbookResult<Option<Category>> {
        if let Some(category) = self.storage.categories.find_by_name(account_id, identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return Ok(self
                .storage
                .categories
                .get(id)?
                .filter(|c| c.account_id == account_id));
        }

        Ok(None)
    }

    /// Like `find`, but a missing category is an error
    pub fn require(&self, account_id: AccountId, identifier: &str) -> CashbookResult<Category> {
        self.find(account_id, identifier)?
            .ok_or_else(|| CashbookError::category_not_found(identifier))
    }

    /// Categories of an account ordered by name
    pub fn list_for_account(&self, account_id: AccountId) -> CashbookResult<Vec<Category>> {
        self.storage.categories.get_by_account(account_id)
    }

    /// Delete a category. Its transactions become uncategorized.
    pub fn delete(&self, id: CategoryId) -> CashbookResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| CashbookError::category_not_found(id.to_string()))?;

        let cleared = self.storage.delete_category(id)?;
        self.storage.categories.save()?;
        if cleared > 0 {
            self.storage.transactions.save()?;
        }

        self.storage.log_entry(
            AuditEntry::delete(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )
            .with_note(format!("{} transactions uncategorized", cleared)),
        )?;

        Ok(category)
    }

    /// Return the ID of the account's category named exactly `name`,
    /// creating the category first if there is none.
    ///
    /// Calling this again with the same account and name returns the same
    /// ID without creating a duplicate, also when callers race on a shared
    /// `Storage`.
    pub fn resolve(&self, account_id: AccountId, name: &str) -> CashbookResult<CategoryId> {
        let (category, created) = self.resolve_unsaved(account_id, name)?;

        if created {
            self.storage.categories.save()?;
            self.storage.log_create(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )?;
        }

        Ok(category.id)
    }

    /// Resolve without persisting. The flag is `true` when the category
    /// was created; the caller is responsible for saving it.
    pub(crate) fn resolve_unsaved(
        &self,
        account_id: AccountId,
        name: &str,
    ) -> CashbookResult<(Category, bool)> {
        if name.is_empty() {
            return Err(CashbookError::Validation(
                "Category name cannot be empty".into(),
            ));
        }
        self.ensure_account(account_id)?;

        let (category, created) = self.storage.categories.get_or_create(account_id, name)?;
        if created {
            tracing::debug!(
                "Created category '{}' ({}) in account {}",
                category.name,
                category.id,
                account_id
            );
        }
        Ok((category, created))
    }
}
