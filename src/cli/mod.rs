//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod audit;
pub mod category;
pub mod export;
pub mod filter;
pub mod import;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use export::handle_export_command;
pub use filter::FilterArgs;
pub use import::handle_import_command;
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{CashbookError, CashbookResult};
use crate::models::Amount;

/// Parse a `YYYY-MM-DD` command-line date
pub(crate) fn parse_date(s: &str) -> CashbookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        CashbookError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s))
    })
}

/// Parse a command-line amount, rejecting anything that is not a number
pub(crate) fn parse_amount(s: &str) -> CashbookResult<Amount> {
    Amount::parse(s).ok_or_else(|| {
        CashbookError::Validation(format!("Invalid amount '{}'. Use a number like 12.50", s))
    })
}
