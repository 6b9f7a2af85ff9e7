//! The ledger state machine.
//!
//! Every public operation is one atomic transition over the ledger namespace:
//! mutations hold the write lock while they read, validate, and stage their
//! writes, then commit the staged batch in a single sled batch. Reads hold the
//! read lock, so they never observe a half-applied mutation.

use crate::error::{LedgerError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tally_core::{AccountId, AccountRecord};
use tally_storage::{LedgerState, StateBatch, Storage};
use tracing::{debug, info, warn};

/// Ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Flush sled to disk after every committed operation.
    #[serde(default)]
    pub flush_on_commit: bool,
}

/// Account ledger enforcing supply conservation.
pub struct Ledger<'a> {
    /// Ledger namespace in storage.
    state: LedgerState<'a>,
    /// Serializes mutations against reads.
    lock: RwLock<()>,
    /// Configuration.
    config: LedgerConfig,
}

impl<'a> Ledger<'a> {
    /// Create a ledger over the given storage.
    pub fn new(storage: &'a Storage, config: LedgerConfig) -> Self {
        Self {
            state: LedgerState::new(storage),
            lock: RwLock::new(()),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Seed total supply and the user counter.
    ///
    /// This is a one-time bootstrap: calling it on an initialized ledger
    /// fails instead of discarding existing balances.
    pub fn init(&self) -> Result<()> {
        let _guard = self.lock.write();

        if self.state.is_initialized()? {
            warn!("ledger already initialized");
            return Err(LedgerError::AlreadyInitialized);
        }

        let mut batch = self.state.begin();
        batch.set_total(0);
        batch.set_user_counter(0);
        self.commit(batch)?;

        info!("ledger initialized");
        Ok(())
    }

    /// Check if genesis has run.
    pub fn is_initialized(&self) -> Result<bool> {
        let _guard = self.lock.read();
        Ok(self.state.is_initialized()?)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a new account holding `amount`, raising total supply by the same.
    pub fn mint(&self, account: &AccountId, amount: u64) -> Result<()> {
        let _guard = self.lock.write();
        logged("mint", self.mint_locked(account, amount))
    }

    fn mint_locked(&self, account: &AccountId, amount: u64) -> Result<()> {
        let mut batch = self.state.begin();
        let total = require_total(&batch)?;

        if self.state.account_exists(account)? {
            return Err(LedgerError::AccountExists(account.clone()));
        }

        let total = total
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("total supply"))?;

        let ordinal = batch.register(account)?;
        batch.put_account(account, AccountRecord::new(amount, ordinal));
        batch.set_total(total);
        self.commit(batch)?;

        info!(%account, amount, ordinal, total, "minted");
        Ok(())
    }

    /// Remove `amount` from `account` and from circulation.
    pub fn withdraw(&self, account: &AccountId, amount: u64) -> Result<()> {
        let _guard = self.lock.write();
        logged("withdraw", self.withdraw_locked(account, amount))
    }

    fn withdraw_locked(&self, account: &AccountId, amount: u64) -> Result<()> {
        let mut batch = self.state.begin();
        require_total(&batch)?;

        stage_withdraw(&mut batch, account, amount, false)?;
        let total = require_total(&batch)?;
        self.commit(batch)?;

        info!(%account, amount, total, "withdrew");
        Ok(())
    }

    /// Move `amount` from one account to another.
    ///
    /// The debit and the credit commit together. A recipient that does not
    /// exist yet is registered with the credited amount.
    pub fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()> {
        let _guard = self.lock.write();
        logged("transfer", self.transfer_locked(from, to, amount))
    }

    fn transfer_locked(&self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()> {
        let mut batch = self.state.begin();
        require_total(&batch)?;

        stage_withdraw(&mut batch, from, amount, true)?;
        stage_credit(&mut batch, to, amount)?;
        self.commit(batch)?;

        info!(%from, %to, amount, "transferred");
        Ok(())
    }

    /// Remove an account.
    ///
    /// Only empty accounts can be deleted, so total supply stays equal to the
    /// sum of balances. The index entry is kept; its ordinal is never reused.
    pub fn delete_user(&self, account: &AccountId) -> Result<()> {
        let _guard = self.lock.write();
        logged("deleteUser", self.delete_user_locked(account))
    }

    fn delete_user_locked(&self, account: &AccountId) -> Result<()> {
        let mut batch = self.state.begin();
        require_total(&batch)?;

        let record = batch
            .account(account)?
            .ok_or_else(|| LedgerError::NotFound(account.clone()))?;
        if record.balance != 0 {
            return Err(LedgerError::BalanceNotZero {
                account: account.clone(),
                balance: record.balance,
            });
        }

        batch.remove_account(account);
        self.commit(batch)?;

        info!(%account, ordinal = record.ordinal, "deleted user");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get the balance of an existing account.
    pub fn balance_of(&self, account: &AccountId) -> Result<u64> {
        let _guard = self.lock.read();
        self.require_initialized()?;

        let record = self
            .state
            .get_account(account)?
            .ok_or_else(|| LedgerError::NotFound(account.clone()))?;

        debug!(%account, balance = record.balance, "balance query");
        Ok(record.balance)
    }

    /// Get total supply.
    pub fn total_amount(&self) -> Result<u64> {
        let _guard = self.lock.read();
        let total = self.state.get_total()?.ok_or(LedgerError::NotInitialized)?;

        debug!(total, "total query");
        Ok(total)
    }

    /// List live accounts in the order they were registered.
    ///
    /// The scan covers ordinals `1..=counter` using the live counter, so it
    /// never truncates. It runs under the read lock and therefore sees a
    /// consistent snapshot; accounts registered after the call starts are not
    /// included. Index entries of deleted accounts are skipped.
    pub fn query_all_users(&self) -> Result<Vec<AccountId>> {
        let _guard = self.lock.read();
        self.require_initialized()?;

        let counter = self.state.get_user_counter()?;
        if counter == 0 {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in self.state.index_entries(1, counter) {
            let (ordinal, account) = entry?;
            // A re-minted account carries a newer ordinal; the old entry is stale
            match self.state.get_account(&account)? {
                Some(record) if record.ordinal == ordinal => users.push(account),
                _ => {}
            }
        }

        debug!(count = users.len(), counter, "user query");
        Ok(users)
    }

    /// Verify that total supply equals the sum of all balances.
    pub fn check_conservation(&self) -> Result<()> {
        let _guard = self.lock.read();
        let total = self.state.get_total()?.ok_or(LedgerError::NotInitialized)?;
        let sum = self.state.sum_balances()?;

        if u128::from(total) != sum {
            warn!(total, %sum, "conservation violated");
            return Err(LedgerError::ConservationViolated { total, sum });
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_initialized(&self) -> Result<()> {
        if !self.state.is_initialized()? {
            return Err(LedgerError::NotInitialized);
        }
        Ok(())
    }

    fn commit(&self, batch: StateBatch<'a>) -> Result<()> {
        batch.commit()?;
        if self.config.flush_on_commit {
            self.state.storage().flush()?;
        }
        Ok(())
    }
}

/// Total supply as staged, or `NotInitialized` before genesis.
fn require_total(batch: &StateBatch<'_>) -> Result<u64> {
    batch.total()?.ok_or(LedgerError::NotInitialized)
}

/// Stage a debit of `amount` from `account`.
///
/// A pure withdrawal also removes the amount from total supply. The debit
/// half of a transfer leaves total supply alone because the paired credit
/// puts the same amount back into circulation.
fn stage_withdraw(
    batch: &mut StateBatch<'_>,
    account: &AccountId,
    amount: u64,
    internal_transfer: bool,
) -> Result<()> {
    let mut record = batch
        .account(account)?
        .ok_or_else(|| LedgerError::NotFound(account.clone()))?;

    let available = record.balance;
    if !record.debit(amount) {
        return Err(LedgerError::InsufficientBalance {
            account: account.clone(),
            required: amount,
            available,
        });
    }

    if !internal_transfer {
        let total = require_total(batch)?
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow("total supply"))?;
        batch.set_total(total);
    }

    batch.put_account(account, record);
    Ok(())
}

/// Stage a credit of `amount` to `account`. Absent accounts start at zero.
fn stage_credit(batch: &mut StateBatch<'_>, account: &AccountId, amount: u64) -> Result<()> {
    let record = match batch.account(account)? {
        Some(mut record) => {
            if !record.credit(amount) {
                return Err(LedgerError::Overflow("account balance"));
            }
            record
        }
        None => {
            let ordinal = batch.register(account)?;
            AccountRecord::new(amount, ordinal)
        }
    };

    batch.put_account(account, record);
    Ok(())
}

fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        warn!(operation, kind = %e.kind(), error = %e, "operation rejected");
    }
    result
}
