//! Core ledger primitives for tally.
//!
//! This crate provides the types shared by the storage and ledger crates:
//! - Account identifiers and stored account records
//! - Operation parsing and argument validation

pub mod account;
pub mod operation;

// Re-export commonly used types at the crate root
pub use account::{AccountId, AccountRecord, RESERVED_NAME};
pub use operation::{parse_amount, Operation, ValidationError, SUPPORTED_OPERATIONS};
