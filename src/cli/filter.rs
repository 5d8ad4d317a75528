//! Filter flags shared by `txn list` and `export`

use clap::Args;

use crate::error::CashbookResult;
use crate::models::{AccountId, FilterSpec};
use crate::services::CategoryService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only transactions in this category (name or ID)
    #[arg(long)]
    pub category: Option<String>,

    /// Only transactions strictly after this date (YYYY-MM-DD)
    #[arg(long)]
    pub after: Option<String>,

    /// Only transactions strictly before this date (YYYY-MM-DD)
    #[arg(long)]
    pub before: Option<String>,

    /// Only transactions whose remark contains this text (case-insensitive)
    #[arg(long)]
    pub remark: Option<String>,

    /// Only transactions with exactly this cash-in or cash-out amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Only transactions with this payment mode (case-insensitive)
    #[arg(long)]
    pub mode: Option<String>,
}

impl FilterArgs {
    /// Build the filter for one account. Category names must already exist.
    pub fn to_spec(&self, storage: &Storage, account_id: AccountId) -> CashbookResult<FilterSpec> {
        let mut spec = FilterSpec::new();

        if let Some(category) = &self.category {
            let found = CategoryService::new(storage).require(account_id, category)?;
            spec.set_category(Some(found.id));
        }

        let after = self.after.as_deref().map(parse_date).transpose()?;
        let before = self.before.as_deref().map(parse_date).transpose()?;
        spec.set_date_range(after, before);

        spec.set_remark(self.remark.clone());
        spec.set_amount(self.amount.as_deref().map(parse_amount).transpose()?);
        spec.set_mode(self.mode.clone());

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashbookPaths;
    use crate::models::{Account, Amount, Category};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_to_spec() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(CashbookPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let account = storage.accounts.insert(Account::new("Wallet")).unwrap();
        let food = storage
            .categories
            .insert(Category::new(account.id, "Food"))
            .unwrap();

        let args = FilterArgs {
            category: Some("Food".into()),
            after: Some("2024-01-01".into()),
            amount: Some("4.5".into()),
            mode: Some("cash".into()),
            ..Default::default()
        };
        let spec = args.to_spec(&storage, account.id).unwrap();

        assert_eq!(spec.category, Some(food.id));
        assert_eq!(spec.date_after, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(spec.date_before, None);
        assert_eq!(spec.amount, Some(Amount::new(4.5)));
        assert_eq!(spec.active_mode(), Some("cash"));
    }

    #[test]
    fn test_unknown_category_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(CashbookPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let account = storage.accounts.insert(Account::new("Wallet")).unwrap();

        let args = FilterArgs {
            category: Some("Travel".into()),
            ..Default::default()
        };
        assert!(args.to_spec(&storage, account.id).unwrap_err().is_not_found());
        assert_eq!(storage.categories.count().unwrap(), 0);
    }
}
