//! Read-only commands: total, users, audit.

use super::{with_ledger, DataDirArgs};
use anyhow::Result;
use colored::Colorize;

pub fn total(args: DataDirArgs) -> Result<()> {
    with_ledger(&args, |ledger| {
        let total = ledger.total_amount()?;

        println!();
        println!("  Total supply: {}", total.to_string().bright_cyan());
        println!();
        Ok(())
    })
}

pub fn users(args: DataDirArgs) -> Result<()> {
    with_ledger(&args, |ledger| {
        let users = ledger.query_all_users()?;

        if users.is_empty() {
            println!("{}", "No accounts found.".yellow());
            println!(
                "Use {} to create one.",
                "tally mint <account> <amount>".bright_cyan()
            );
            return Ok(());
        }

        println!("{}", "Accounts:".bold().cyan());
        println!();
        for (i, account) in users.iter().enumerate() {
            let balance = ledger.balance_of(account)?;
            println!(
                "  {} {} {}",
                format!("{}.", i + 1).bright_black(),
                account.as_str().bright_yellow(),
                balance.to_string().bright_cyan()
            );
        }
        println!();
        Ok(())
    })
}

pub fn audit(args: DataDirArgs) -> Result<()> {
    with_ledger(&args, |ledger| {
        ledger.check_conservation()?;

        println!(
            "{}  Total supply {} matches the sum of balances",
            "✓".green().bold(),
            ledger.total_amount()?.to_string().bright_cyan()
        );
        Ok(())
    })
}
