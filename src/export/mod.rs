//! Export module for Cashbook
//!
//! Transactions are exported as CSV in the same dialect the importer reads.

pub mod csv;

pub use self::csv::{encode_transactions_csv, export_transactions_csv, CSV_DATE_FORMAT, CSV_HEADER};
