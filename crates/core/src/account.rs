//! Account identifiers and stored account state.

use crate::operation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the key holding total supply. Never usable as an account.
pub const RESERVED_NAME: &str = "Total";

/// A validated account identifier.
///
/// Identifiers are free-form strings, but they may not be empty and may not
/// collide with the reserved supply key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyAccount);
        }
        if id == RESERVED_NAME {
            return Err(ValidationError::ReservedName(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The stored state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Current balance.
    pub balance: u64,
    /// Position in the user index, fixed when the account is first written.
    pub ordinal: u64,
}

impl AccountRecord {
    /// Create a record for a newly registered account.
    pub fn new(balance: u64, ordinal: u64) -> Self {
        Self { balance, ordinal }
    }

    /// Add to the balance.
    /// Returns false (and leaves the balance unchanged) on overflow.
    pub fn credit(&mut self, amount: u64) -> bool {
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Subtract from the balance.
    /// Returns false if the balance is insufficient.
    pub fn debit(&mut self, amount: u64) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}
