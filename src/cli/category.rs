//! Category CLI commands
//!
//! Categories always belong to an account, so every command takes
//! `--account`.

use clap::Subcommand;

use crate::display::category::format_category_list;
use crate::error::CashbookResult;
use crate::services::{AccountService, CategoryService};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
        /// Account name or ID
        #[arg(short, long)]
        account: String,
    },
    /// List the categories of an account
    List {
        /// Account name or ID
        #[arg(short, long)]
        account: String,
    },
    /// Delete a category; its transactions become uncategorized
    Delete {
        /// Category name or ID
        category: String,
        /// Account name or ID
        #[arg(short, long)]
        account: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> CashbookResult<()> {
    let accounts = AccountService::new(storage);
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Add { name, account } => {
            let account = accounts.require(&account)?;
            let category = service.create(account.id, &name)?;
            println!("Created category: {} in {}", category.name, account.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::List { account } => {
            let account = accounts.require(&account)?;
            let categories = service.list_for_account(account.id)?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Delete { category, account } => {
            let account = accounts.require(&account)?;
            let found = service.require(account.id, &category)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
