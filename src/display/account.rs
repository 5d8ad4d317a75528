//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::Amount;
use crate::services::account::AccountSummary;

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>8}  {:>12}\n",
        "ID",
        "Name",
        "Entries",
        "Balance",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:->8}  {:->12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in summaries {
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>8}  {:>12}\n",
            summary.account.id.to_string(),
            summary.account.name,
            summary.transaction_count,
            summary.balance.format_fixed(),
            name_width = name_width,
        ));
    }

    let total: Amount = summaries.iter().map(|s| s.balance).sum();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>8}  {:>12}\n",
        "",
        "Total",
        "",
        total.format_fixed(),
        name_width = name_width,
    ));

    output
}

/// Format account details
pub fn format_account_details(summary: &AccountSummary) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:           {}\n", account.id));
    output.push_str(&format!(
        "  Created:      {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("  Transactions: {}\n", summary.transaction_count));
    output.push_str(&format!("  Balance:      {}\n", summary.balance.format_fixed()));
    output
}
