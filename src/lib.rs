//! Cashbook - personal finance tracker
//!
//! This library provides the core functionality for the `cashbook` binary:
//! accounts that own categories and transactions, a staged filter engine,
//! balance aggregation, and CSV exchange.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, categories, transactions, filters)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (filtering, balances, import)
//! - `export`: CSV export
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use cashbook::config::paths::CashbookPaths;
//! use cashbook::storage::Storage;
//! use cashbook::services::AccountService;
//!
//! let storage = Storage::new(CashbookPaths::new()?)?;
//! storage.load_all()?;
//! let wallet = AccountService::new(&storage).create("Wallet")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{CashbookError, CashbookResult};
