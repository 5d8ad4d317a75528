//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::CashbookResult;
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    #[command(alias = "create")]
    Add {
        /// Account name
        name: String,
    },
    /// List all accounts with their balances
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        name: String,
    },
    /// Delete an account with all its categories and transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> CashbookResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Add { name } => {
            let account = service.create(&name)?;
            println!("Created account: {}", account.name);
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let summaries = service.list_with_balances()?;
            print!("{}", format_account_list(&summaries));
        }

        AccountCommands::Show { account } => {
            let found = service.require(&account)?;
            let summary = service.get_summary(&found)?;
            print!("{}", format_account_details(&summary));
        }

        AccountCommands::Rename { account, name } => {
            let found = service.require(&account)?;
            let renamed = service.rename(found.id, &name)?;
            println!("Renamed account: {} -> {}", found.name, renamed.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.require(&account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
