//! CLI commands module.

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tally_ledger::Ledger;
use tally_storage::Storage;

mod account;
mod init;
mod invoke;
mod query;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ledger
    Init(init::InitArgs),
    /// Create an account holding newly minted supply
    Mint(account::MintArgs),
    /// Check an account balance
    Balance(account::AccountArgs),
    /// Withdraw from an account, removing supply from circulation
    Withdraw(account::WithdrawArgs),
    /// Move value between accounts
    Transfer(account::TransferArgs),
    /// Delete an empty account
    Delete(account::AccountArgs),
    /// Show total supply
    Total(DataDirArgs),
    /// List accounts in mint order
    Users(DataDirArgs),
    /// Check that total supply equals the sum of balances
    Audit(DataDirArgs),
    /// Run a raw ledger operation by name
    Invoke(invoke::InvokeArgs),
}

/// Location of the ledger data.
#[derive(Args)]
pub struct DataDirArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    pub data_dir: PathBuf,
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Mint(args) => account::mint(args),
        Commands::Balance(args) => account::balance(args),
        Commands::Withdraw(args) => account::withdraw(args),
        Commands::Transfer(args) => account::transfer(args),
        Commands::Delete(args) => account::delete(args),
        Commands::Total(args) => query::total(args),
        Commands::Users(args) => query::users(args),
        Commands::Audit(args) => query::audit(args),
        Commands::Invoke(args) => invoke::run(args),
    }
}

/// Open the ledger in `data_dir` and run `f` against it.
pub(crate) fn with_ledger<T>(
    data_dir: &DataDirArgs,
    f: impl FnOnce(&Ledger<'_>) -> Result<T>,
) -> Result<T> {
    let config = CliConfig::load(&data_dir.data_dir)?;
    let storage = Storage::open(&data_dir.data_dir)
        .with_context(|| "Failed to open storage. Did you run 'tally init'?")?;

    let ledger = Ledger::new(&storage, config.ledger);
    f(&ledger)
}
