//! Import CLI command

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CashbookError, CashbookResult};
use crate::services::{AccountService, ImportService};
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &Path, account: &str) -> CashbookResult<()> {
    let target = AccountService::new(storage).require(account)?;

    let handle = File::open(file)
        .map_err(|e| CashbookError::Import(format!("cannot open {}: {}", file.display(), e)))?;

    let result = ImportService::new(storage).import_csv(BufReader::new(handle), target.id)?;

    println!("Import into '{}' complete", target.name);
    println!("  Imported:            {}", result.imported.len());
    println!("  Skipped:             {}", result.skipped);
    if result.categories_created > 0 {
        println!("  Categories created:  {}", result.categories_created);
    }

    Ok(())
}
