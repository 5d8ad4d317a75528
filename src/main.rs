use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cashbook::cli::{
    handle_account_command, handle_audit_command, handle_category_command, handle_export_command,
    handle_import_command, handle_transaction_command, FilterArgs,
};
use cashbook::config::{paths::CashbookPaths, settings::Settings};
use cashbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cashbook",
    version,
    about = "Personal cash book: accounts, categories and transactions",
    long_about = "Cashbook keeps a ledger of money coming in and going out per account. \
                  Transactions can be filtered by category, date, remark, amount and \
                  payment mode, and exchanged with other tools as CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(cashbook::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(cashbook::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(cashbook::cli::TransactionCommands),

    /// Import transactions from a CSV file into an account
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Target account name or ID
        #[arg(short, long)]
        account: String,
    },

    /// Export the transactions of an account as CSV
    Export {
        /// Output file, or `-` for stdout
        file: PathBuf,
        /// Account name or ID
        #[arg(short, long)]
        account: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show recent audit log entries
    #[command(alias = "history")]
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = CashbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    // Initialize storage
    let storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);
    storage.load_all()?;

    match cli.command {
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import { file, account }) => {
            handle_import_command(&storage, &file, &account)?;
        }
        Some(Commands::Export {
            file,
            account,
            filter,
        }) => {
            handle_export_command(&storage, &file, &account, &filter)?;
        }
        Some(Commands::Audit { count }) => {
            handle_audit_command(&storage, count)?;
        }
        Some(Commands::Config) => {
            println!("Cashbook Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Display date format: {}", settings.display_date_format);
            println!("  Log filter:          {}", settings.log_filter);
            println!("  Audit enabled:       {}", settings.audit_enabled);
        }
        None => {
            println!("Cashbook - personal cash book");
            println!();
            println!("Run 'cashbook --help' for usage information.");
        }
    }

    Ok(())
}
