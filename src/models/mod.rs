//! Core data models for Cashbook
//!
//! Accounts, categories, transactions, amounts and filter criteria.

pub mod account;
pub mod amount;
pub mod category;
pub mod filter;
pub mod ids;
pub mod transaction;

pub use account::Account;
pub use amount::Amount;
pub use category::Category;
pub use filter::FilterSpec;
pub use ids::{AccountId, CategoryId, TransactionId};
pub use transaction::Transaction;
