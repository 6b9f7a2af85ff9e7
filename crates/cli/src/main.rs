//! tally CLI entry point.

use clap::Parser;
use colored::Colorize;
use tally_ledger::LedgerError;
use tracing::Level;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A minimal accounting ledger", long_about = None)]
struct Cli {
    /// Log ledger activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("{} {}", "Error:".red().bold(), describe_error(&e));
                std::process::exit(1);
            }
        }
        None => {
            println!("tally - A minimal accounting ledger");
            println!("Run 'tally --help' for usage information.");
        }
    }
}

/// Ledger failures are prefixed with their kind, e.g. `[NotFound] ...`.
fn describe_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<LedgerError>() {
        Some(ledger_err) => format!("[{}] {}", ledger_err.kind(), e),
        None => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_ledger_error() {
        let err = anyhow::Error::from(LedgerError::NotInitialized);
        assert_eq!(describe_error(&err), "[NotInitialized] ledger not initialized");
    }

    #[test]
    fn test_describe_other_error() {
        let err = anyhow::anyhow!("Failed to create data directory");
        assert_eq!(describe_error(&err), "Failed to create data directory");
    }
}
