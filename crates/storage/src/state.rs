//! Ledger state layout (accounts, total supply, user index).
//!
//! All keys live in one sled namespace:
//!
//! | Key                   | Value            |
//! |-----------------------|------------------|
//! | `Total`               | `u64` supply     |
//! | `meta:user_counter`   | `u64` last ordinal |
//! | `account:{id}`        | [`AccountRecord`] |
//! | `user:{ordinal:020}`  | [`AccountId`]    |
//!
//! Reads go through [`LedgerState`]. Writes are staged in a [`StateBatch`]
//! and committed in one atomic sled batch.

use crate::db::{BatchOp, Result, Storage};
use std::collections::BTreeMap;
use tally_core::{AccountId, AccountRecord};

/// Read access to the ledger namespace.
#[derive(Clone, Copy)]
pub struct LedgerState<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerState<'a> {
    /// Create a new LedgerState wrapping the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &'a Storage {
        self.storage
    }

    /// Start staging writes against this state.
    pub fn begin(&self) -> StateBatch<'a> {
        StateBatch::new(*self)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Get an account record. Absent accounts are `None`, never zero.
    pub fn get_account(&self, account: &AccountId) -> Result<Option<AccountRecord>> {
        self.storage.get(Storage::account_key(account))
    }

    /// Check if an account exists.
    pub fn account_exists(&self, account: &AccountId) -> Result<bool> {
        self.storage.contains(Storage::account_key(account))
    }

    /// Sum every stored balance.
    ///
    /// Returned as `u128` so that a corrupted store cannot overflow the sum.
    pub fn sum_balances(&self) -> Result<u128> {
        let mut sum = 0u128;
        for item in self.storage.scan_prefix::<AccountRecord>(Storage::ACCOUNT_PREFIX) {
            let (_, record) = item?;
            sum += u128::from(record.balance);
        }
        Ok(sum)
    }

    // =========================================================================
    // Total Supply
    // =========================================================================

    /// Get total supply. `None` until genesis has run.
    pub fn get_total(&self) -> Result<Option<u64>> {
        self.storage.get(Storage::TOTAL_KEY)
    }

    /// Check if genesis has run.
    pub fn is_initialized(&self) -> Result<bool> {
        self.storage.contains(Storage::TOTAL_KEY)
    }

    // =========================================================================
    // User Index
    // =========================================================================

    /// Last ordinal handed out. Zero when no account was ever registered.
    pub fn get_user_counter(&self) -> Result<u64> {
        Ok(self
            .storage
            .get::<_, u64>(Storage::USER_COUNTER_KEY)?
            .unwrap_or(0))
    }

    /// Iterate index entries with ordinals in `first..=last`, in ordinal order.
    pub fn index_entries(
        &self,
        first: u64,
        last: u64,
    ) -> impl Iterator<Item = Result<(u64, AccountId)>> {
        self.storage
            .scan_range::<AccountId>(
                &Storage::user_index_key(first),
                &Storage::user_index_key(last),
            )
            .map(|item| -> Result<(u64, AccountId)> {
                let (key, account) = item?;
                Ok((Storage::parse_user_index_key(&key)?, account))
            })
    }
}

/// Writes staged for a single atomic commit.
///
/// Reads through the batch see staged values first, so an operation that
/// touches the same key twice (a self-transfer, for instance) observes its
/// own earlier writes.
pub struct StateBatch<'a> {
    state: LedgerState<'a>,
    accounts: BTreeMap<AccountId, Option<AccountRecord>>,
    total: Option<u64>,
    user_counter: Option<u64>,
    index: Vec<(u64, AccountId)>,
}

impl<'a> StateBatch<'a> {
    fn new(state: LedgerState<'a>) -> Self {
        Self {
            state,
            accounts: BTreeMap::new(),
            total: None,
            user_counter: None,
            index: Vec::new(),
        }
    }

    /// Get an account record, including staged changes.
    pub fn account(&self, account: &AccountId) -> Result<Option<AccountRecord>> {
        match self.accounts.get(account) {
            Some(staged) => Ok(*staged),
            None => self.state.get_account(account),
        }
    }

    /// Get total supply, including staged changes.
    pub fn total(&self) -> Result<Option<u64>> {
        match self.total {
            Some(total) => Ok(Some(total)),
            None => self.state.get_total(),
        }
    }

    /// Get the user counter, including staged changes.
    pub fn user_counter(&self) -> Result<u64> {
        match self.user_counter {
            Some(counter) => Ok(counter),
            None => self.state.get_user_counter(),
        }
    }

    /// Stage an account write.
    pub fn put_account(&mut self, account: &AccountId, record: AccountRecord) {
        self.accounts.insert(account.clone(), Some(record));
    }

    /// Stage an account removal.
    pub fn remove_account(&mut self, account: &AccountId) {
        self.accounts.insert(account.clone(), None);
    }

    /// Stage a new total supply.
    pub fn set_total(&mut self, total: u64) {
        self.total = Some(total);
    }

    /// Stage a new user counter.
    pub fn set_user_counter(&mut self, counter: u64) {
        self.user_counter = Some(counter);
    }

    /// Assign the next ordinal to `account` and stage its index entry.
    /// The counter bump is committed together with the entry.
    pub fn register(&mut self, account: &AccountId) -> Result<u64> {
        let ordinal = self.user_counter()? + 1;
        self.user_counter = Some(ordinal);
        self.index.push((ordinal, account.clone()));
        Ok(ordinal)
    }

    /// Check if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.total.is_none()
            && self.user_counter.is_none()
            && self.index.is_empty()
    }

    /// Encode staged writes as storage batch operations.
    fn into_ops(self) -> Result<Vec<BatchOp>> {
        let mut ops = Vec::with_capacity(self.accounts.len() + self.index.len() + 2);

        for (account, record) in &self.accounts {
            let key = Storage::account_key(account);
            match record {
                Some(record) => ops.push(BatchOp::Insert {
                    key,
                    value: bincode::serialize(record)?,
                }),
                None => ops.push(BatchOp::Remove { key }),
            }
        }

        for (ordinal, account) in &self.index {
            ops.push(BatchOp::Insert {
                key: Storage::user_index_key(*ordinal),
                value: bincode::serialize(account)?,
            });
        }

        if let Some(counter) = self.user_counter {
            ops.push(BatchOp::Insert {
                key: Storage::USER_COUNTER_KEY.to_vec(),
                value: bincode::serialize(&counter)?,
            });
        }

        if let Some(total) = self.total {
            ops.push(BatchOp::Insert {
                key: Storage::TOTAL_KEY.to_vec(),
                value: bincode::serialize(&total)?,
            });
        }

        Ok(ops)
    }

    /// Commit all staged writes atomically.
    ///
    /// Either every staged write lands or none does.
    pub fn commit(self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let storage = self.state.storage;
        let ops = self.into_ops()?;
        storage.batch(ops)
    }
}
