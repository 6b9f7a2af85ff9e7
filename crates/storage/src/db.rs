//! sled database wrapper with serialization helpers.

use sled::Db;
use std::path::Path;
use tally_core::AccountId;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Invalid key in {0} range")]
    InvalidKey(&'static str),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Wrapper around sled database with serialization helpers.
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Store a serializable value.
    pub fn put<K, V>(&self, key: K, value: &V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: serde::Serialize,
    {
        let encoded = bincode::serialize(value)?;
        self.db.insert(key, encoded)?;
        Ok(())
    }

    /// Retrieve and deserialize a value.
    pub fn get<K, V>(&self, key: K) -> Result<Option<V>>
    where
        K: AsRef<[u8]>,
        V: serde::de::DeserializeOwned,
    {
        match self.db.get(key)? {
            Some(bytes) => {
                let value = bincode::deserialize(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Check if a key exists.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        Ok(self.db.contains_key(key)?)
    }

    /// Iterate decoded values for every key in `start..=end`, in key order.
    ///
    /// The iterator is lazy: each item is read from sled as it is pulled.
    pub fn scan_range<V>(
        &self,
        start: &[u8],
        end: &[u8],
    ) -> impl Iterator<Item = Result<(Vec<u8>, V)>>
    where
        V: serde::de::DeserializeOwned,
    {
        self.db
            .range(start.to_vec()..=end.to_vec())
            .map(|item| -> Result<(Vec<u8>, V)> {
                let (key, value) = item?;
                Ok((key.to_vec(), bincode::deserialize(&value)?))
            })
    }

    /// Iterate decoded values for every key starting with `prefix`.
    pub fn scan_prefix<V>(&self, prefix: &[u8]) -> impl Iterator<Item = Result<(Vec<u8>, V)>>
    where
        V: serde::de::DeserializeOwned,
    {
        self.db
            .scan_prefix(prefix)
            .map(|item| -> Result<(Vec<u8>, V)> {
                let (key, value) = item?;
                Ok((key.to_vec(), bincode::deserialize(&value)?))
            })
    }

    /// Apply multiple operations atomically.
    ///
    /// Note: Atomicity is provided by sled's `apply_batch`. The batch collects
    /// operations in memory, then `apply_batch` writes them atomically using
    /// sled's write-ahead log (WAL).
    pub fn batch(&self, operations: Vec<BatchOp>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for op in operations {
            match op {
                BatchOp::Insert { key, value } => batch.insert(key, value),
                BatchOp::Remove { key } => batch.remove(key),
            }
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    // =========================================================================
    // Key Construction Helpers
    // =========================================================================

    /// Key holding total supply.
    pub const TOTAL_KEY: &'static [u8] = b"Total";

    /// Key holding the last assigned user-index ordinal.
    pub const USER_COUNTER_KEY: &'static [u8] = b"meta:user_counter";

    /// Prefix shared by all account keys.
    pub const ACCOUNT_PREFIX: &'static [u8] = b"account:";

    /// Prefix shared by all user-index keys.
    pub const USER_INDEX_PREFIX: &'static [u8] = b"user:";

    /// Create a prefixed key for accounts.
    /// Format: "account:" + identifier bytes
    pub fn account_key(account: &AccountId) -> Vec<u8> {
        let mut key = Self::ACCOUNT_PREFIX.to_vec();
        key.extend_from_slice(account.as_bytes());
        key
    }

    /// Create a prefixed key for a user-index entry.
    /// Format: "user:{ordinal:020}"
    ///
    /// Zero padding keeps lexicographic key order equal to ordinal order.
    pub fn user_index_key(ordinal: u64) -> Vec<u8> {
        format!("user:{:020}", ordinal).into_bytes()
    }

    /// Recover the ordinal from a user-index key.
    pub fn parse_user_index_key(key: &[u8]) -> Result<u64> {
        key.strip_prefix(Self::USER_INDEX_PREFIX)
            .and_then(|digits| std::str::from_utf8(digits).ok())
            .and_then(|digits| digits.parse().ok())
            .ok_or(StorageError::InvalidKey("user index"))
    }
}

/// Batch operation for atomic updates.
pub enum BatchOp {
    Insert { key: Vec<u8>, value: Vec<u8> },
    Remove { key: Vec<u8> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_temporary() {
        let storage = Storage::open_temporary().unwrap();
        assert!(storage.db.is_empty());
    }

    #[test]
    fn test_put_get() {
        let storage = Storage::open_temporary().unwrap();

        // Store a value
        storage.put("key1", &42u64).unwrap();

        // Retrieve it
        let value: Option<u64> = storage.get("key1").unwrap();
        assert_eq!(value, Some(42));

        // Non-existent key returns None
        let missing: Option<u64> = storage.get("missing").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_batch_operations() {
        let storage = Storage::open_temporary().unwrap();
        storage.put("gone", &0u64).unwrap();

        let ops = vec![
            BatchOp::Insert {
                key: b"a".to_vec(),
                value: bincode::serialize(&1u64).unwrap(),
            },
            BatchOp::Insert {
                key: b"b".to_vec(),
                value: bincode::serialize(&2u64).unwrap(),
            },
            BatchOp::Remove {
                key: b"gone".to_vec(),
            },
        ];
        storage.batch(ops).unwrap();

        let a: u64 = storage.get("a").unwrap().unwrap();
        let b: u64 = storage.get("b").unwrap().unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert!(!storage.contains("gone").unwrap());
    }

    #[test]
    fn test_scan_range_is_ordered_and_bounded() {
        let storage = Storage::open_temporary().unwrap();

        // Insert out of order, past the width of a single digit
        for ordinal in [12u64, 3, 1, 10, 2] {
            storage
                .put(Storage::user_index_key(ordinal), &ordinal)
                .unwrap();
        }

        let values: Vec<u64> = storage
            .scan_range::<u64>(&Storage::user_index_key(1), &Storage::user_index_key(10))
            .map(|item| item.map(|(_, v)| v))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(values, vec![1, 2, 3, 10]);

        // Restartable: a second scan sees the same entries
        let again = storage
            .scan_range::<u64>(&Storage::user_index_key(1), &Storage::user_index_key(10))
            .count();
        assert_eq!(again, 4);
    }

    #[test]
    fn test_scan_prefix() {
        let storage = Storage::open_temporary().unwrap();
        let alice = AccountId::new("alice").unwrap();
        let bob = AccountId::new("bob").unwrap();

        storage.put(Storage::account_key(&alice), &5u64).unwrap();
        storage.put(Storage::account_key(&bob), &7u64).unwrap();
        storage.put(Storage::TOTAL_KEY, &12u64).unwrap();

        let sum: u64 = storage
            .scan_prefix::<u64>(Storage::ACCOUNT_PREFIX)
            .map(|item| item.unwrap().1)
            .sum();
        assert_eq!(sum, 12);
    }

    #[test]
    fn test_key_construction() {
        let alice = AccountId::new("alice").unwrap();

        let account_key = Storage::account_key(&alice);
        assert_eq!(account_key, b"account:alice");

        let index_key = Storage::user_index_key(42);
        assert_eq!(index_key, b"user:00000000000000000042");
        assert_eq!(Storage::parse_user_index_key(&index_key).unwrap(), 42);

        assert!(matches!(
            Storage::parse_user_index_key(b"account:alice"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
