//! Category model
//!
//! Categories are labels scoped to one account. Names are matched exactly
//! (case-sensitive) when resolving a category by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId};

/// A category within an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier
    pub id: CategoryId,

    /// The account this category belongs to
    pub account_id: AccountId,

    /// Category name
    pub name: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, not yet inserted category
    pub fn new(account_id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::UNASSIGNED,
            account_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new(AccountId::new(1), "Food");
        assert_eq!(category.account_id, AccountId::new(1));
        assert_eq!(category.name, "Food");
        assert!(category.validate().is_ok());
        assert_eq!(category.to_string(), "Food");
    }

    #[test]
    fn test_empty_name_rejected() {
        let category = Category::new(AccountId::new(1), "");
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));
    }

    #[test]
    fn test_whitespace_name_is_kept() {
        // Names are matched exactly; surrounding spaces are part of the name
        let category = Category::new(AccountId::new(1), " Food ");
        assert!(category.validate().is_ok());
        assert_eq!(category.name, " Food ");
    }
}
