//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display:
//! a register view with the balance of the listed rows, and a detail view.

use std::collections::HashMap;

use crate::models::{Amount, Category, CategoryId, Transaction};

/// Category names by ID, for rendering rows
pub type CategoryNames = HashMap<CategoryId, String>;

pub fn category_names(categories: &[Category]) -> CategoryNames {
    categories.iter().map(|c| (c.id, c.name.clone())).collect()
}

fn category_label<'a>(txn: &Transaction, names: &'a CategoryNames) -> &'a str {
    txn.category_id
        .and_then(|id| names.get(&id))
        .map(String::as_str)
        .unwrap_or("-")
}

fn blank_if_zero(amount: Amount) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.format_fixed()
    }
}

/// Format a single register row
pub fn format_transaction_row(txn: &Transaction, names: &CategoryNames, date_format: &str) -> String {
    format!(
        "{:<8} {:<10} {:<5} {:20} {:14} {:8} {:>10} {:>10}",
        txn.id.to_string(),
        txn.date.format(date_format).to_string(),
        truncate(&txn.time, 5),
        truncate(&txn.remark, 20),
        truncate(category_label(txn, names), 14),
        truncate(&txn.mode, 8),
        blank_if_zero(txn.cash_in),
        blank_if_zero(txn.cash_out),
    )
}

/// Format a list of transactions as a register followed by their balance
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &CategoryNames,
    balance: Amount,
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:<10} {:<5} {:20} {:14} {:8} {:>10} {:>10}\n",
        "ID", "Date", "Time", "Remark", "Category", "Mode", "Cash In", "Cash Out"
    ));
    output.push_str(&"-".repeat(92));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, names, date_format));
        output.push('\n');
    }

    output.push_str(&"-".repeat(92));
    output.push('\n');
    output.push_str(&format!(
        "{} transactions, balance: {}\n",
        transactions.len(),
        balance.format_fixed()
    ));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, category_name: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Account:     {}\n", txn.account_id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));

    if !txn.time.is_empty() {
        output.push_str(&format!("Time:        {}\n", txn.time));
    }
    if !txn.remark.is_empty() {
        output.push_str(&format!("Remark:      {}\n", txn.remark));
    }

    match category_name {
        Some(name) => output.push_str(&format!("Category:    {}\n", name)),
        None => output.push_str("Category:    (uncategorized)\n"),
    }

    if !txn.mode.is_empty() {
        output.push_str(&format!("Mode:        {}\n", txn.mode));
    }
    output.push_str(&format!("Cash in:     {}\n", txn.cash_in.format_fixed()));
    output.push_str(&format!("Cash out:    {}\n", txn.cash_out.format_fixed()));

    output
}

/// Pad or cut a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, TransactionId};
    use chrono::NaiveDate;

    fn coffee() -> Transaction {
        let mut txn = Transaction::with_details(
            AccountId::new(1),
            Some(CategoryId::new(2)),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "10:00",
            "Coffee",
            "Cash",
            Amount::ZERO,
            Amount::new(4.5),
        );
        txn.id = TransactionId::new(7);
        txn
    }

    #[test]
    fn test_row_uses_category_name_and_date_format() {
        let mut names = CategoryNames::new();
        names.insert(CategoryId::new(2), "Food".to_string());

        let row = format_transaction_row(&coffee(), &names, "%d/%m/%Y");
        assert!(row.starts_with("txn-7"));
        assert!(row.contains("05/01/2024"));
        assert!(row.contains("Food"));
        assert!(row.contains("4.50"));
    }

    #[test]
    fn test_register_shows_balance() {
        let output =
            format_transaction_register(&[coffee()], &CategoryNames::new(), Amount::new(-4.5), "%Y-%m-%d");
        assert!(output.contains("Cash Out"));
        assert!(output.contains("1 transactions, balance: -4.50"));
    }

    #[test]
    fn test_empty_register() {
        let output = format_transaction_register(&[], &CategoryNames::new(), Amount::ZERO, "%Y-%m-%d");
        assert_eq!(output, "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&coffee(), None);
        assert!(output.contains("Transaction: txn-7"));
        assert!(output.contains("(uncategorized)"));
        assert!(output.contains("Cash out:    4.50"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Café au lait extra", 8), "Café ...");
        assert_eq!(truncate("Tea", 5), "Tea  ");
    }
}
