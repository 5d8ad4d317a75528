//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::{
    category_names, format_transaction_details, format_transaction_register,
};
use crate::error::{CashbookError, CashbookResult};
use crate::models::TransactionId;
use crate::services::{
    AccountService, CategoryService, CreateTransactionInput, TransactionService,
    UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, FilterArgs};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Account name or ID
        account: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Time of day as free text (e.g. "09:15")
        #[arg(short, long, default_value = "")]
        time: String,
        /// Remark
        #[arg(short, long, default_value = "")]
        remark: String,
        /// Category name or ID (must exist in the account)
        #[arg(short, long)]
        category: Option<String>,
        /// Payment mode (e.g. cash, card, upi)
        #[arg(short, long, default_value = "")]
        mode: String,
        /// Money received
        #[arg(long = "cash-in")]
        cash_in: Option<String>,
        /// Money spent
        #[arg(long = "cash-out")]
        cash_out: Option<String>,
    },
    /// List the transactions of an account with their balance
    List {
        /// Account name or ID
        account: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New time
        #[arg(short, long)]
        time: Option<String>,
        /// New remark
        #[arg(short, long)]
        remark: Option<String>,
        /// New category name or ID
        #[arg(short, long, conflicts_with = "uncategorize")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        uncategorize: bool,
        /// New payment mode
        #[arg(short, long)]
        mode: Option<String>,
        /// New cash-in amount
        #[arg(long = "cash-in")]
        cash_in: Option<String>,
        /// New cash-out amount
        #[arg(long = "cash-out")]
        cash_out: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Move a transaction to another account
    Move {
        /// Transaction ID
        id: String,
        /// Target account name or ID
        #[arg(long)]
        to: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> CashbookResult<()> {
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            account,
            date,
            time,
            remark,
            category,
            mode,
            cash_in,
            cash_out,
        } => {
            let account = accounts.require(&account)?;

            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let mut input = CreateTransactionInput::new(account.id, date);
            input.time = time;
            input.remark = remark;
            input.mode = mode;
            if let Some(category) = category {
                input.category_id = Some(categories.require(account.id, &category)?.id);
            }
            if let Some(amount) = cash_in {
                input.cash_in = parse_amount(&amount)?;
            }
            if let Some(amount) = cash_out {
                input.cash_out = parse_amount(&amount)?;
            }

            let txn = service.create(input)?;
            println!("Created transaction: {}", txn.id);
            println!("  Account: {}", account.name);
            println!("  Date:    {}", txn.date.format("%Y-%m-%d"));
            println!("  Balance: {}", txn.balance().format_fixed());
        }

        TransactionCommands::List { account, filter } => {
            let account = accounts.require(&account)?;
            let spec = filter.to_spec(storage, account.id)?;
            let result = service.list_filtered(account.id, &spec)?;
            let names = category_names(&categories.list_for_account(account.id)?);

            print!(
                "{}",
                format_transaction_register(
                    &result.transactions,
                    &names,
                    result.balance,
                    &settings.display_date_format,
                )
            );
        }

        TransactionCommands::Show { id } => {
            let id = parse_transaction_id(&id)?;
            let txn = service
                .get(id)?
                .ok_or_else(|| CashbookError::transaction_not_found(id.to_string()))?;
            let category = match txn.category_id {
                Some(category_id) => categories.get(category_id)?.map(|c| c.name),
                None => None,
            };
            print!("{}", format_transaction_details(&txn, category.as_deref()));
        }

        TransactionCommands::Edit {
            id,
            date,
            time,
            remark,
            category,
            uncategorize,
            mode,
            cash_in,
            cash_out,
        } => {
            let id = parse_transaction_id(&id)?;
            let existing = service
                .get(id)?
                .ok_or_else(|| CashbookError::transaction_not_found(id.to_string()))?;

            let category_id = if uncategorize {
                Some(None)
            } else if let Some(category) = category {
                Some(Some(categories.require(existing.account_id, &category)?.id))
            } else {
                None
            };

            let input = UpdateTransactionInput {
                date: date.as_deref().map(parse_date).transpose()?,
                time,
                remark,
                mode,
                cash_in: cash_in.as_deref().map(parse_amount).transpose()?,
                cash_out: cash_out.as_deref().map(parse_amount).transpose()?,
                category_id,
            };

            let txn = service.update(id, input)?;
            println!("Updated transaction: {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            let id = parse_transaction_id(&id)?;
            let txn = service.delete(id)?;
            println!("Deleted transaction: {}", txn.id);
        }

        TransactionCommands::Move { id, to } => {
            let id = parse_transaction_id(&id)?;
            let target = accounts.require(&to)?;
            let txn = service.move_to_account(id, target.id)?;
            println!("Moved transaction {} to {}", txn.id, target.name);
        }
    }

    Ok(())
}

fn parse_transaction_id(s: &str) -> CashbookResult<TransactionId> {
    s.trim()
        .parse()
        .map_err(|_| CashbookError::Validation(format!("Invalid transaction ID: {}", s)))
}
