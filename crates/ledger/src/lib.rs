//! Account ledger for tally.
//!
//! This crate brings the storage layer and the core types together into a
//! ledger that tracks per-account balances and total supply:
//! - **Ledger**: mint, withdraw, transfer, delete, and queries, each one
//!   atomic and serialized against the others
//! - **Dispatch**: the name-and-string-arguments surface over the ledger
//! - **Errors**: typed failures with the kind names reported to callers
//!
//! Total supply always equals the sum of all balances: mints raise both,
//! withdrawals lower both, transfers move value without touching the total.
//!
//! # Example
//!
//! ```rust,no_run
//! use tally_core::AccountId;
//! use tally_ledger::{Ledger, LedgerConfig};
//! use tally_storage::Storage;
//!
//! // Setup storage
//! let storage = Storage::open("./ledger_data").unwrap();
//!
//! // Bootstrap the ledger once
//! let ledger = Ledger::new(&storage, LedgerConfig::default());
//! ledger.init().unwrap();
//!
//! let alice = AccountId::new("alice").unwrap();
//! let bob = AccountId::new("bob").unwrap();
//! ledger.mint(&alice, 100).unwrap();
//! ledger.transfer(&alice, &bob, 40).unwrap();
//!
//! // Or through the dispatch surface
//! let payload = ledger.invoke("balanceOf", &["bob"]).unwrap();
//! assert_eq!(payload, b"40");
//! ```

pub mod dispatch;
pub mod error;
pub mod ledger;

// Re-export commonly used types
pub use error::{ErrorKind, LedgerError, Result};
pub use ledger::{Ledger, LedgerConfig};
