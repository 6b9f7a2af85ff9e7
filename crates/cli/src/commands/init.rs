//! Initialize ledger command.

use super::DataDirArgs;
use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use tally_ledger::{Ledger, LedgerConfig};
use tally_storage::Storage;

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Flush to disk after every committed operation
    #[arg(long)]
    flush_on_commit: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let data_dir = &args.store.data_dir;

    println!("{}", "Initializing tally...".bold().cyan());
    println!();

    // Create data directory
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    // Open storage
    let storage = Storage::open(data_dir).with_context(|| "Failed to open storage")?;

    println!("{}  Created data directory", "✓".green().bold());

    let config = LedgerConfig {
        flush_on_commit: args.flush_on_commit,
    };

    // Seed total supply; refuses to run twice
    let ledger = Ledger::new(&storage, config);
    ledger
        .init()
        .with_context(|| "Failed to initialize ledger")?;

    println!("{}  Seeded total supply", "✓".green().bold());
    println!("    Total: {}", "0".bright_cyan());

    // Save config
    let config_file = CliConfig::new(ledger.config().clone()).save(data_dir)?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        config_file.display().to_string().bright_black()
    );

    println!();
    println!("{}", "Ledger initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to create accounts",
        "tally mint <account> <amount>".bright_cyan()
    );
    println!(
        "  • Use {} to move value",
        "tally transfer <from> <to> <amount>".bright_cyan()
    );
    println!("  • Use {} to list accounts", "tally users".bright_cyan());

    Ok(())
}
