//! CSV export of transactions
//!
//! Produces the spreadsheet format read back by the importer:
//!
//! ```text
//! Date,Time,Remark,Category,Mode,Cash In,Cash Out
//! 2024-01-05,10:00,Coffee,Food,Cash,0.0,4.5
//! ```
//!
//! Text fields containing a comma are wrapped in double quotes. Embedded
//! quotes are written as is.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{CashbookError, CashbookResult};
use crate::models::{Category, CategoryId, Transaction};

/// Header row of the transaction CSV format
pub const CSV_HEADER: &str = "Date,Time,Remark,Category,Mode,Cash In,Cash Out";

/// Date format used in CSV files
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d";

/// Category cell for transactions without a known category
pub const MISSING_CATEGORY: &str = "N/A";

/// Encode transactions as CSV text, one row per transaction in input order.
///
/// Rows are separated by `\n` with no trailing newline.
pub fn encode_transactions_csv(transactions: &[Transaction], categories: &[Category]) -> String {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(transactions.iter().map(|txn| encode_row(txn, &names)));
    lines.join("\n")
}

/// Write the CSV encoding of `transactions` to `writer`
pub fn export_transactions_csv<W: Write>(
    writer: &mut W,
    transactions: &[Transaction],
    categories: &[Category],
) -> CashbookResult<()> {
    let text = encode_transactions_csv(transactions, categories);

    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| CashbookError::Export(e.to_string()))?;

    tracing::info!("Exported {} transactions to CSV", transactions.len());
    Ok(())
}

fn encode_row(txn: &Transaction, names: &HashMap<CategoryId, &str>) -> String {
    let category = txn
        .category_id
        .and_then(|id| names.get(&id).copied())
        .unwrap_or(MISSING_CATEGORY);

    format!(
        "{},{},{},{},{},{},{}",
        txn.date.format(CSV_DATE_FORMAT),
        txn.time,
        quote_if_needed(&txn.remark),
        quote_if_needed(category),
        quote_if_needed(&txn.mode),
        txn.cash_in,
        txn.cash_out
    )
}

/// Wrap a field in quotes if it contains a comma
fn quote_if_needed(s: &str) -> String {
    if s.contains(',') {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}
