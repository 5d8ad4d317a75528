//! Export CLI command
//!
//! Writes the (optionally filtered) transactions of an account as CSV.
//! A file name of `-` writes to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{CashbookError, CashbookResult};
use crate::export::export_transactions_csv;
use crate::services::{AccountService, CategoryService, TransactionService};
use crate::storage::Storage;

use super::FilterArgs;

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    file: &Path,
    account: &str,
    filter: &FilterArgs,
) -> CashbookResult<()> {
    let target = AccountService::new(storage).require(account)?;
    let spec = filter.to_spec(storage, target.id)?;

    let result = TransactionService::new(storage).list_filtered(target.id, &spec)?;
    let categories = CategoryService::new(storage).list_for_account(target.id)?;

    if file.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        export_transactions_csv(&mut out, &result.transactions, &categories)?;
        writeln!(out).map_err(|e| CashbookError::Export(e.to_string()))?;
        return Ok(());
    }

    let handle = File::create(file)
        .map_err(|e| CashbookError::Export(format!("cannot create {}: {}", file.display(), e)))?;
    let mut writer = BufWriter::new(handle);
    export_transactions_csv(&mut writer, &result.transactions, &categories)?;

    println!(
        "Exported {} transactions to: {}",
        result.transactions.len(),
        file.display()
    );

    Ok(())
}
