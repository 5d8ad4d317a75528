//! CSV Import service
//!
//! Reads the transaction CSV dialect written by the exporter. The first line
//! is a header naming the columns; columns are looked up by name so their
//! order does not matter and unknown columns are ignored.
//!
//! The dialect is deliberately naive: lines are split on every comma and one
//! pair of surrounding double quotes is removed from each cell. A quoted
//! value that itself contains a comma is therefore split in two.
//!
//! Rows are isolated from each other. A row that cannot be parsed or stored
//! is logged and skipped; rows before it stay imported and categories it
//! created are kept. Only a failure of the underlying reader aborts the
//! import.

use std::collections::HashMap;
use std::io::Read;

use chrono::{Days, Local, NaiveDate};
use csv::{ByteRecord, ReaderBuilder};
use thiserror::Error;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{CashbookError, CashbookResult};
use crate::models::{AccountId, Amount, Transaction, TransactionId};
use crate::storage::Storage;

use super::category::CategoryService;

/// A data row after column mapping, before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line number in the input
    pub line: u64,
    pub date: NaiveDate,
    pub time: String,
    pub remark: String,
    /// Category name, `None` if the cell is missing or empty
    pub category: Option<String>,
    pub mode: String,
    pub cash_in: Amount,
    pub cash_out: Amount,
}

/// Why a single row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line {line}: invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            Self::InvalidDate { line, .. } | Self::Malformed { line, .. } => *line,
        }
    }
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// IDs of imported transactions, in input order
    pub imported: Vec<TransactionId>,
    /// Number of data rows that were skipped
    pub skipped: usize,
    /// Number of categories created while resolving names
    pub categories_created: usize,
}

/// Header name to column index. The last occurrence of a name wins.
struct ColumnMap {
    columns: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_header(record: &ByteRecord) -> Self {
        let columns = record
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let name = String::from_utf8_lossy(cell);
                (strip_quotes(name.trim()).to_string(), index)
            })
            .collect();
        Self { columns }
    }

    fn cell<'r>(&self, cells: &'r [String], name: &str) -> Option<&'r str> {
        self.columns
            .get(name)
            .and_then(|&index| cells.get(index))
            .map(String::as_str)
    }
}

/// Remove one pair of surrounding double quotes, if present
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Invalid UTF-8 (e.g. a Latin-1 spreadsheet) is replaced, not rejected
fn decode_cells(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| strip_quotes(&String::from_utf8_lossy(cell)).to_string())
        .collect()
}

/// Parse `YYYY-MM-DD` the way spreadsheet tools accept it: anything after
/// the day digits is ignored (`2024-02-01 00:00:00`), and out-of-range
/// months and days roll over (`2024-02-30` is 2024-03-01).
fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim_start().splitn(3, '-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: i64 = parts.next()?.parse().ok()?;

    let rest = parts.next()?;
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let day: u64 = rest[..digits].parse().ok()?;

    let months = year.checked_mul(12)?.checked_add(month - 1)?;
    let first = NaiveDate::from_ymd_opt(
        i32::try_from(months.div_euclid(12)).ok()?,
        u32::try_from(months.rem_euclid(12) + 1).ok()?,
        1,
    )?;

    match day {
        0 => first.checked_sub_days(Days::new(1)),
        _ => first.checked_add_days(Days::new(day - 1)),
    }
}

fn parse_row(
    columns: &ColumnMap,
    cells: &[String],
    line: u64,
    today: NaiveDate,
) -> Result<ParsedRow, RowError> {
    let date = match columns.cell(cells, "Date") {
        Some(raw) => parse_lenient_date(raw).ok_or_else(|| RowError::InvalidDate {
            line,
            value: raw.to_string(),
        })?,
        None => today,
    };

    let text = |name: &str| columns.cell(cells, name).unwrap_or_default().to_string();
    let amount = |name: &str| {
        columns
            .cell(cells, name)
            .map(Amount::parse_or_zero)
            .unwrap_or(Amount::ZERO)
    };

    let category = text("Category");

    Ok(ParsedRow {
        line,
        date,
        time: text("Time"),
        // Remarks exported by older versions could carry a second layer of quotes
        remark: strip_quotes(&text("Remark")).to_string(),
        category: (!category.is_empty()).then_some(category),
        mode: text("Mode"),
        cash_in: amount("Cash In"),
        cash_out: amount("Cash Out"),
    })
}

/// Drive `visit` with every data row of `reader`. Errors returned by
/// `visit` abort the walk.
fn read_rows<R, F>(reader: R, today: NaiveDate, mut visit: F) -> CashbookResult<()>
where
    R: Read,
    F: FnMut(Result<ParsedRow, RowError>) -> CashbookResult<()>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = csv_reader.byte_records();

    let columns = match records.next() {
        None => return Ok(()),
        Some(Err(e)) => return Err(CashbookError::Import(format!("Failed to read CSV header: {}", e))),
        Some(Ok(header)) => ColumnMap::from_header(&header),
    };

    for record in records {
        let row = match record {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                parse_row(&columns, &decode_cells(&record), line, today)
            }
            Err(e) if e.is_io_error() => {
                return Err(CashbookError::Import(format!("Failed to read CSV: {}", e)));
            }
            Err(e) => Err(RowError::Malformed {
                line: e.position().map(|p| p.line()).unwrap_or_default(),
                message: e.to_string(),
            }),
        };
        visit(row)?;
    }

    Ok(())
}

/// Parse every data row without touching storage, for previews.
///
/// Missing dates default to today's local date.
pub fn parse_csv_rows<R: Read>(reader: R) -> CashbookResult<Vec<Result<ParsedRow, RowError>>> {
    let mut rows = Vec::new();
    read_rows(reader, Local::now().date_naive(), |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import every row of `reader` into `account_id`.
    ///
    /// Storage is written once after the last row.
    pub fn import_csv<R: Read>(&self, reader: R, account_id: AccountId) -> CashbookResult<ImportResult> {
        if self.storage.accounts.get(account_id)?.is_none() {
            return Err(CashbookError::account_not_found(account_id.to_string()));
        }

        let categories = CategoryService::new(self.storage);
        let mut result = ImportResult::default();
        let mut audit = Vec::new();

        let walk = read_rows(reader, Local::now().date_naive(), |row| {
            let stored = match row {
                Ok(parsed) => {
                    let line = parsed.line;
                    self.store_row(&categories, account_id, parsed, &mut result, &mut audit)
                        .map_err(|e| format!("line {}: {}", line, e))
                }
                Err(e) => Err(e.to_string()),
            };

            if let Err(reason) = stored {
                tracing::warn!("Skipping CSV row: {}", reason);
                result.skipped += 1;
            }
            Ok(())
        });

        // Rows stored before a read failure are kept, as with skipped rows
        self.persist(&result)?;
        self.storage.log_entries(&audit)?;
        walk?;

        tracing::info!(
            "Imported {} transactions into account {} ({} skipped, {} categories created)",
            result.imported.len(),
            account_id,
            result.skipped,
            result.categories_created
        );

        Ok(result)
    }

    fn store_row(
        &self,
        categories: &CategoryService<'_>,
        account_id: AccountId,
        row: ParsedRow,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> CashbookResult<()> {
        let category_id = match &row.category {
            Some(name) => {
                let (category, created) = categories.resolve_unsaved(account_id, name)?;
                if created {
                    result.categories_created += 1;
                    audit.push(AuditEntry::create(
                        EntityType::Category,
                        category.id.to_string(),
                        Some(category.name.clone()),
                        &category,
                    ));
                }
                Some(category.id)
            }
            None => None,
        };

        let txn = Transaction::with_details(
            account_id,
            category_id,
            row.date,
            row.time,
            row.remark,
            row.mode,
            row.cash_in,
            row.cash_out,
        );
        let txn = self.storage.transactions.insert(txn)?;

        audit.push(
            AuditEntry::create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.remark.clone()),
                &txn,
            )
            .with_note("csv import"),
        );
        result.imported.push(txn.id);
        Ok(())
    }

    fn persist(&self, result: &ImportResult) -> CashbookResult<()> {
        if result.categories_created > 0 {
            self.storage.categories.save()?;
        }
        if !result.imported.is_empty() {
            self.storage.transactions.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashbookPaths;
    use crate::export::encode_transactions_csv;
    use crate::models::{Account, Category, CategoryId};
    use std::io;
    use tempfile::TempDir;

    const HEADER: &str = "Date,Time,Remark,Category,Mode,Cash In,Cash Out";

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup_account(storage: &Storage, name: &str) -> AccountId {
        storage.accounts.insert(Account::new(name)).unwrap().id
    }

    fn import(storage: &Storage, account: AccountId, text: &str) -> ImportResult {
        ImportService::new(storage)
            .import_csv(text.as_bytes(), account)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_import_creates_missing_category() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let result = import(
            &storage,
            account,
            &format!("{}\n2024-02-01,09:00,Lunch,Food,Card,0,12.00", HEADER),
        );

        assert_eq!(result.imported.len(), 1);
        assert_eq!(result.categories_created, 1);

        let categories = storage.categories.get_by_account(account).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Food");

        let txn = storage.transactions.get(result.imported[0]).unwrap().unwrap();
        assert_eq!(txn.category_id, Some(categories[0].id));
        assert_eq!(txn.date, date(2024, 2, 1));
        assert_eq!(txn.time, "09:00");
        assert_eq!(txn.remark, "Lunch");
        assert_eq!(txn.mode, "Card");
        assert_eq!(txn.cash_in, Amount::ZERO);
        assert_eq!(txn.cash_out, Amount::new(12.0));
    }

    #[test]
    fn test_import_reuses_existing_category() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");
        let food = storage.categories.insert(Category::new(account, "Food")).unwrap();

        let result = import(
            &storage,
            account,
            &format!("{}\n2024-02-01,,A,Food,,,1\n2024-02-02,,B,Food,,,2", HEADER),
        );

        assert_eq!(result.categories_created, 0);
        assert_eq!(storage.categories.count().unwrap(), 1);
        for id in result.imported {
            let txn = storage.transactions.get(id).unwrap().unwrap();
            assert_eq!(txn.category_id, Some(food.id));
        }
    }

    #[test]
    fn test_bad_amount_defaults_and_bad_layout_is_skipped() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let text = format!(
            "{}\n2024-02-01,09:00,Gift,,Cash,abc,0\ngarbage\n2024-02-03,10:00,Tea,,Cash,0,2",
            HEADER
        );
        let result = import(&storage, account, &text);

        assert_eq!(result.imported.len(), 2);
        assert_eq!(result.skipped, 1);

        let gift = storage.transactions.get(result.imported[0]).unwrap().unwrap();
        assert_eq!(gift.cash_in, Amount::ZERO);
        assert_eq!(gift.remark, "Gift");
    }

    #[test]
    fn test_failed_row_keeps_earlier_rows_and_categories() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let text = format!(
            "{}\n2024-02-01,,Lunch,Food,,,12\n01/02/2024,,Dinner,Travel,,,20",
            HEADER
        );
        let result = import(&storage, account, &text);

        assert_eq!(result.imported.len(), 1);
        assert_eq!(result.skipped, 1);
        // The bad date is detected before resolution, so Travel is never created
        assert_eq!(storage.categories.count().unwrap(), 1);
    }

    #[test]
    fn test_empty_input_imports_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let result = import(&storage, account, "");
        assert!(result.imported.is_empty());
        assert_eq!(result.skipped, 0);

        let result = import(&storage, account, HEADER);
        assert!(result.imported.is_empty());
    }

    #[test]
    fn test_columns_are_mapped_by_header_name() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let text = " \"Cash Out\" ,Remark,Ignored,Date\n7.5,Taxi,x,2024-03-04";
        let result = import(&storage, account, text);

        let txn = storage.transactions.get(result.imported[0]).unwrap().unwrap();
        assert_eq!(txn.cash_out, Amount::new(7.5));
        assert_eq!(txn.remark, "Taxi");
        assert_eq!(txn.date, date(2024, 3, 4));
        assert_eq!(txn.category_id, None);
    }

    #[test]
    fn test_duplicate_header_last_occurrence_wins() {
        let rows = parse_csv_rows("Remark,Remark\nfirst,second".as_bytes()).unwrap();
        assert_eq!(rows[0].as_ref().unwrap().remark, "second");
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let before = Local::now().date_naive();
        let rows = parse_csv_rows("Remark,Cash In\nGift,50".as_bytes()).unwrap();
        let after = Local::now().date_naive();

        let row = rows[0].as_ref().unwrap();
        assert!(row.date == before || row.date == after);
        assert_eq!(row.time, "");
        assert_eq!(row.mode, "");
        assert_eq!(row.category, None);
        assert_eq!(row.cash_in, Amount::new(50.0));
        assert_eq!(row.cash_out, Amount::ZERO);
    }

    #[test]
    fn test_short_row_uses_defaults_for_missing_cells() {
        let text = format!("{}\n2024-02-01,09:00", HEADER);
        let rows = parse_csv_rows(text.as_bytes()).unwrap();
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.time, "09:00");
        assert_eq!(row.remark, "");
        assert_eq!(row.cash_out, Amount::ZERO);
    }

    #[test]
    fn test_quotes_are_stripped_but_commas_still_split() {
        let text = format!("{}\n2024-02-01,\"10:00\",\"Tea, milk\",,Cash,0,1", HEADER);
        let rows = parse_csv_rows(text.as_bytes()).unwrap();
        let row = rows[0].as_ref().unwrap();

        assert_eq!(row.time, "10:00");
        // `"Tea` and ` milk"` land in separate columns; only the opening quote
        // is left on the remark because the pair is not complete
        assert_eq!(row.remark, "\"Tea");
        assert_eq!(row.category.as_deref(), Some(" milk\""));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_skipped() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let mut bytes = format!("{}\n", HEADER).into_bytes();
        bytes.extend_from_slice(b"2024-02-01,09:00,Caf\xe9,Food,Card,0,3.5\n2024-02-02,,Ok,,,,2");

        let result = ImportService::new(&storage)
            .import_csv(bytes.as_slice(), account)
            .unwrap();
        assert_eq!(result.imported.len(), 2);
        assert_eq!(result.skipped, 0);

        let cafe = storage.transactions.get(result.imported[0]).unwrap().unwrap();
        assert_eq!(cafe.remark, "Caf\u{FFFD}");
        assert_eq!(cafe.cash_out, Amount::new(3.5));
    }

    #[test]
    fn test_date_cell_trailing_text_is_ignored() {
        let text = format!(
            "{}\n2024-02-01 00:00:00,,a,,,,1\n2024-02-01 ,,b,,,,1\n2024-2-1,,c,,,,1",
            HEADER
        );
        let rows = parse_csv_rows(text.as_bytes()).unwrap();
        for row in &rows {
            assert_eq!(row.as_ref().unwrap().date, date(2024, 2, 1));
        }
    }

    #[test]
    fn test_date_overflow_rolls_over() {
        assert_eq!(parse_lenient_date("2024-02-30"), Some(date(2024, 3, 1)));
        assert_eq!(parse_lenient_date("2023-02-29"), Some(date(2023, 3, 1)));
        assert_eq!(parse_lenient_date("2024-13-01"), Some(date(2025, 1, 1)));
        assert_eq!(parse_lenient_date("2024-03-00"), Some(date(2024, 2, 29)));
        assert_eq!(parse_lenient_date("2024-01-05"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_unparsable_dates_are_rejected() {
        for raw in ["not-a-date", "01/02/2024", "2024-02", "2024-02-x", ""] {
            assert_eq!(parse_lenient_date(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_parse_reports_row_errors_with_lines() {
        let text = format!("{}\n2024-02-01,,a,,,,1\nnot-a-date,,b,,,,1", HEADER);
        let rows = parse_csv_rows(text.as_bytes()).unwrap();

        assert!(rows[0].is_ok());
        let err = rows[1].as_ref().unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(matches!(err, RowError::InvalidDate { .. }));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let text = format!("{}\n\n2024-02-01,,a,,,,1\n\n", HEADER);
        let rows = parse_csv_rows(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_import_into_missing_account_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let err = ImportService::new(&storage)
            .import_csv(HEADER.as_bytes(), AccountId::new(5))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    struct BrokenReader {
        sent: bool,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
            }
            self.sent = true;
            let data = b"Date,Remark\n2024-01-01,partial";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_reader_failure_aborts_import() {
        let (_temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");

        let err = ImportService::new(&storage)
            .import_csv(BrokenReader { sent: false }, account)
            .unwrap_err();
        assert!(matches!(err, CashbookError::Import(_)));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let (_temp_dir, storage) = create_test_storage();
        let source = setup_account(&storage, "Source");
        let target = setup_account(&storage, "Target");
        let food = storage.categories.insert(Category::new(source, "Food")).unwrap();

        let originals = vec![
            Transaction::with_details(
                source,
                Some(food.id),
                date(2024, 1, 5),
                "10:00",
                "Coffee",
                "Cash",
                Amount::ZERO,
                Amount::new(4.5),
            ),
            Transaction::with_details(
                source,
                None,
                date(2023, 12, 31),
                "",
                "Salary",
                "Bank",
                Amount::new(2500.75),
                Amount::ZERO,
            ),
        ];
        let categories = storage.categories.get_by_account(source).unwrap();
        let text = encode_transactions_csv(&originals, &categories);

        let result = import(&storage, target, &text);
        assert_eq!(result.imported.len(), 2);

        let name_of = |id: Option<CategoryId>| {
            id.and_then(|id| storage.categories.get(id).unwrap())
                .map(|c| c.name)
        };

        for (original, id) in originals.iter().zip(&result.imported) {
            let copy = storage.transactions.get(*id).unwrap().unwrap();
            assert_eq!(copy.account_id, target);
            assert_eq!(copy.date, original.date);
            assert_eq!(copy.time, original.time);
            assert_eq!(copy.remark, original.remark);
            assert_eq!(copy.mode, original.mode);
            assert_eq!(copy.cash_in, original.cash_in);
            assert_eq!(copy.cash_out, original.cash_out);
            assert_eq!(
                name_of(copy.category_id),
                name_of(original.category_id).or(Some("N/A".to_string()))
            );
        }
    }

    #[test]
    fn test_import_is_persisted() {
        let (temp_dir, storage) = create_test_storage();
        let account = setup_account(&storage, "Wallet");
        import(
            &storage,
            account,
            &format!("{}\n2024-02-01,09:00,Lunch,Food,Card,0,12.00", HEADER),
        );

        let paths = CashbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.transactions.count().unwrap(), 1);
        assert_eq!(reloaded.categories.count().unwrap(), 1);
    }
}
