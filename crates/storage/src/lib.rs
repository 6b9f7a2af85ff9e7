//! Persistent storage layer for tally.
//!
//! This crate provides the storage backend for the ledger:
//! - Account records (balance and user-index ordinal)
//! - Total supply
//! - The user index used for ordered enumeration
//! - Atomic multi-key commits
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Ledger Layer                          │
//! │        (validation, locking, conservation rules)         │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   Storage Layer                          │
//! │  ┌──────────────────────────┐  ┌─────────────────────┐  │
//! │  │ LedgerState / StateBatch │  │ Storage (DB)        │  │
//! │  │  - Accounts              │  │  - sled wrapper     │  │
//! │  │  - Total supply          │  │  - serialization    │  │
//! │  │  - User index + counter  │  │  - key helpers      │  │
//! │  │  - Staged atomic commit  │  │  - range scans      │  │
//! │  └──────────────────────────┘  └─────────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                    sled Database                         │
//! │              (Embedded Key-Value Store)                  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tally_core::{AccountId, AccountRecord};
//! use tally_storage::{LedgerState, Storage};
//!
//! // Open database
//! let storage = Storage::open("./ledger_data").unwrap();
//!
//! // Stage and commit writes atomically
//! let state = LedgerState::new(&storage);
//! let alice = AccountId::new("alice").unwrap();
//! let mut batch = state.begin();
//! let ordinal = batch.register(&alice).unwrap();
//! batch.put_account(&alice, AccountRecord::new(100, ordinal));
//! batch.set_total(100);
//! batch.commit().unwrap();
//! ```

pub mod db;
pub mod state;

// Re-export commonly used types
pub use db::{BatchOp, Result, Storage, StorageError};
pub use state::{LedgerState, StateBatch};
