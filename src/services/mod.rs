//! Service layer for Cashbook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod account;
pub mod balance;
pub mod category;
pub mod filter;
pub mod import;
pub mod transaction;

pub use account::{AccountService, AccountSummary};
pub use balance::compute_balance;
pub use category::CategoryService;
pub use filter::{compute_filtered_view, FilterStage, TransactionView};
pub use import::{parse_csv_rows, ImportResult, ImportService, ParsedRow, RowError};
pub use transaction::{
    CreateTransactionInput, FilteredTransactions, TransactionService, UpdateTransactionInput,
};
