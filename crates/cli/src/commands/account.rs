//! Account commands: mint, balance, withdraw, transfer, delete.

use super::{with_ledger, DataDirArgs};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tally_core::{parse_amount, AccountId};
use tally_ledger::LedgerError;

#[derive(Args)]
pub struct AccountArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Account name
    account: String,
}

#[derive(Args)]
pub struct MintArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Account name (must not exist yet)
    account: String,

    /// Amount to mint
    #[arg(allow_hyphen_values = true)]
    amount: String,
}

#[derive(Args)]
pub struct WithdrawArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Account name
    account: String,

    /// Amount to withdraw
    #[arg(allow_hyphen_values = true)]
    amount: String,
}

#[derive(Args)]
pub struct TransferArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Sending account
    from: String,

    /// Receiving account
    to: String,

    /// Amount to transfer
    #[arg(allow_hyphen_values = true)]
    amount: String,
}

pub fn mint(args: MintArgs) -> Result<()> {
    let account = account_id(&args.account)?;
    let amount = amount(&args.amount)?;

    with_ledger(&args.store, |ledger| {
        ledger.mint(&account, amount)?;

        println!(
            "{}  Minted {} to {}",
            "✓".green().bold(),
            amount.to_string().bright_cyan(),
            account.as_str().bright_yellow()
        );
        println!(
            "    Total supply: {}",
            ledger.total_amount()?.to_string().bright_cyan()
        );
        Ok(())
    })
}

pub fn balance(args: AccountArgs) -> Result<()> {
    let account = account_id(&args.account)?;

    with_ledger(&args.store, |ledger| {
        let balance = ledger.balance_of(&account)?;

        println!();
        println!("  Account: {}", account.as_str().bright_yellow());
        println!("  Balance: {}", balance.to_string().bright_cyan());
        println!();
        Ok(())
    })
}

pub fn withdraw(args: WithdrawArgs) -> Result<()> {
    let account = account_id(&args.account)?;
    let amount = amount(&args.amount)?;

    with_ledger(&args.store, |ledger| {
        ledger.withdraw(&account, amount)?;

        println!(
            "{}  Withdrew {} from {}",
            "✓".green().bold(),
            amount.to_string().bright_cyan(),
            account.as_str().bright_yellow()
        );
        println!(
            "    New balance:  {}",
            ledger.balance_of(&account)?.to_string().bright_cyan()
        );
        println!(
            "    Total supply: {}",
            ledger.total_amount()?.to_string().bright_cyan()
        );
        Ok(())
    })
}

pub fn transfer(args: TransferArgs) -> Result<()> {
    let from = account_id(&args.from)?;
    let to = account_id(&args.to)?;
    let amount = amount(&args.amount)?;

    with_ledger(&args.store, |ledger| {
        ledger.transfer(&from, &to, amount)?;

        println!(
            "{}  Transferred {} from {} to {}",
            "✓".green().bold(),
            amount.to_string().bright_cyan(),
            from.as_str().bright_yellow(),
            to.as_str().bright_yellow()
        );
        println!(
            "    {}: {}",
            from,
            ledger.balance_of(&from)?.to_string().bright_cyan()
        );
        println!(
            "    {}: {}",
            to,
            ledger.balance_of(&to)?.to_string().bright_cyan()
        );
        Ok(())
    })
}

pub fn delete(args: AccountArgs) -> Result<()> {
    let account = account_id(&args.account)?;

    with_ledger(&args.store, |ledger| {
        ledger.delete_user(&account)?;

        println!(
            "{}  Deleted {}",
            "✓".green().bold(),
            account.as_str().bright_yellow()
        );
        Ok(())
    })
}

fn account_id(name: &str) -> Result<AccountId> {
    Ok(AccountId::new(name).map_err(LedgerError::from)?)
}

fn amount(text: &str) -> Result<u64> {
    Ok(parse_amount(text).map_err(LedgerError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ledger::ErrorKind;

    fn kind(e: anyhow::Error) -> ErrorKind {
        e.downcast_ref::<LedgerError>()
            .expect("ledger error")
            .kind()
    }

    #[test]
    fn test_account_id_argument() {
        assert_eq!(account_id("alice").unwrap().as_str(), "alice");
        assert_eq!(kind(account_id("Total").unwrap_err()), ErrorKind::ReservedName);
        assert_eq!(kind(account_id("").unwrap_err()), ErrorKind::EmptyAccount);
    }

    #[test]
    fn test_amount_argument() {
        assert_eq!(amount("40").unwrap(), 40);
        assert_eq!(kind(amount("-40").unwrap_err()), ErrorKind::NegativeAmount);
        assert_eq!(kind(amount("forty").unwrap_err()), ErrorKind::InvalidAmount);
    }
}
