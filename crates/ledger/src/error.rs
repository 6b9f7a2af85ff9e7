//! Ledger errors and their caller-facing kinds.

use std::fmt;
use tally_core::{AccountId, ValidationError};
use tally_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("the user already exists: {0}")]
    AccountExists(AccountId),

    #[error("account not found: {0}")]
    NotFound(AccountId),

    #[error("insufficient balance: account {account}, required {required}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        required: u64,
        available: u64,
    },

    #[error("account {account} still holds {balance}; move or withdraw it before deleting")]
    BalanceNotZero { account: AccountId, balance: u64 },

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("ledger not initialized")]
    NotInitialized,

    #[error("ledger already initialized")]
    AlreadyInitialized,

    #[error("conservation violated: total {total}, sum of balances {sum}")]
    ConservationViolated { total: u64, sum: u128 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Named error kinds reported on the dispatch surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgumentCount,
    ReservedName,
    EmptyAccount,
    NegativeAmount,
    InvalidAmount,
    UnknownOperation,
    AccountExists,
    InsufficientBalance,
    NotFound,
    BalanceNotZero,
    Overflow,
    NotInitialized,
    AlreadyInitialized,
    ConservationViolated,
    StoreFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgumentCount => "InvalidArgumentCount",
            ErrorKind::ReservedName => "ReservedName",
            ErrorKind::EmptyAccount => "EmptyAccount",
            ErrorKind::NegativeAmount => "NegativeAmount",
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::UnknownOperation => "UnknownOperation",
            ErrorKind::AccountExists => "AccountExists",
            ErrorKind::InsufficientBalance => "InsufficientBalance",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::BalanceNotZero => "BalanceNotZero",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::NotInitialized => "NotInitialized",
            ErrorKind::AlreadyInitialized => "AlreadyInitialized",
            ErrorKind::ConservationViolated => "ConservationViolated",
            ErrorKind::StoreFailure => "StoreFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LedgerError {
    /// The kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(e) => match e {
                ValidationError::InvalidArgumentCount { .. } => ErrorKind::InvalidArgumentCount,
                ValidationError::ReservedName(_) => ErrorKind::ReservedName,
                ValidationError::EmptyAccount => ErrorKind::EmptyAccount,
                ValidationError::NegativeAmount(_) => ErrorKind::NegativeAmount,
                ValidationError::InvalidAmount(_) => ErrorKind::InvalidAmount,
                ValidationError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            },
            LedgerError::Storage(_) => ErrorKind::StoreFailure,
            LedgerError::AccountExists(_) => ErrorKind::AccountExists,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::BalanceNotZero { .. } => ErrorKind::BalanceNotZero,
            LedgerError::Overflow(_) => ErrorKind::Overflow,
            LedgerError::NotInitialized => ErrorKind::NotInitialized,
            LedgerError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            LedgerError::ConservationViolated { .. } => ErrorKind::ConservationViolated,
        }
    }
}
