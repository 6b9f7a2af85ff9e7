//! Name-and-arguments dispatch surface.
//!
//! Callers that only speak strings (the CLI `invoke` command, or any host
//! runtime) address the ledger through [`Ledger::invoke`]. Successful calls
//! return a byte payload:
//!
//! | Operation              | Payload                      |
//! |------------------------|------------------------------|
//! | `mint`                 | empty                        |
//! | `balanceOf`, `balance` | decimal balance              |
//! | `withdraw`             | empty                        |
//! | `transfer`             | empty                        |
//! | `totalAmount`          | decimal total                |
//! | `queryAllUsers`        | `{"User":["alice","bob"]}`   |
//! | `deleteUser`           | empty                        |

use crate::error::Result;
use crate::ledger::Ledger;
use serde_json::json;
use tally_core::Operation;
use tracing::{debug, warn};

impl<'a> Ledger<'a> {
    /// Parse and run a named operation.
    pub fn invoke<S: AsRef<str>>(&self, name: &str, args: &[S]) -> Result<Vec<u8>> {
        let op = match Operation::parse(name, args) {
            Ok(op) => op,
            Err(e) => {
                warn!(operation = name, error = %e, "invalid invocation");
                return Err(e.into());
            }
        };
        self.execute(&op)
    }

    /// Run a parsed operation.
    pub fn execute(&self, op: &Operation) -> Result<Vec<u8>> {
        debug!(operation = op.name(), read_only = op.is_read_only(), "executing");

        let payload = match op {
            Operation::Mint { account, amount } => {
                self.mint(account, *amount)?;
                Vec::new()
            }
            Operation::BalanceOf { account } => self.balance_of(account)?.to_string().into_bytes(),
            Operation::Withdraw { account, amount } => {
                self.withdraw(account, *amount)?;
                Vec::new()
            }
            Operation::Transfer { from, to, amount } => {
                self.transfer(from, to, *amount)?;
                Vec::new()
            }
            Operation::TotalAmount => self.total_amount()?.to_string().into_bytes(),
            Operation::QueryAllUsers => {
                let accounts = self.query_all_users()?;
                let users: Vec<&str> = accounts.iter().map(|account| account.as_str()).collect();
                json!({ "User": users }).to_string().into_bytes()
            }
            Operation::DeleteUser { account } => {
                self.delete_user(account)?;
                Vec::new()
            }
        };

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::ledger::{Ledger, LedgerConfig};
    use tally_storage::Storage;

    fn call(ledger: &Ledger<'_>, name: &str, args: &[&str]) -> Vec<u8> {
        ledger.invoke(name, args).unwrap()
    }

    fn call_err(ledger: &Ledger<'_>, name: &str, args: &[&str]) -> ErrorKind {
        ledger.invoke(name, args).unwrap_err().kind()
    }

    #[test]
    fn test_invoke_round() {
        let storage = Storage::open_temporary().unwrap();
        let ledger = Ledger::new(&storage, LedgerConfig::default());
        ledger.init().unwrap();

        assert!(call(&ledger, "mint", &["alice", "100"]).is_empty());
        assert!(call(&ledger, "transfer", &["alice", "bob", "40"]).is_empty());
        assert!(call(&ledger, "withdraw", &["bob", "15"]).is_empty());

        assert_eq!(call(&ledger, "balanceOf", &["alice"]), b"60");
        assert_eq!(call(&ledger, "balance", &["bob"]), b"25");
        assert_eq!(call(&ledger, "totalAmount", &[]), b"85");
    }

    #[test]
    fn test_query_all_users_payload() {
        let storage = Storage::open_temporary().unwrap();
        let ledger = Ledger::new(&storage, LedgerConfig::default());
        ledger.init().unwrap();

        assert_eq!(call(&ledger, "queryAllUsers", &[]), br#"{"User":[]}"#);

        call(&ledger, "mint", &["alice", "1"]);
        call(&ledger, "mint", &["bob", "2"]);

        let payload = call(&ledger, "queryAllUsers", &[]);
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value, serde_json::json!({ "User": ["alice", "bob"] }));
    }

    #[test]
    fn test_invoke_errors() {
        let storage = Storage::open_temporary().unwrap();
        let ledger = Ledger::new(&storage, LedgerConfig::default());
        ledger.init().unwrap();

        assert_eq!(
            call_err(&ledger, "mint", &["alice"]),
            ErrorKind::InvalidArgumentCount
        );
        assert_eq!(
            call_err(&ledger, "mint", &["Total", "100"]),
            ErrorKind::ReservedName
        );
        assert_eq!(
            call_err(&ledger, "mint", &["alice", "-3"]),
            ErrorKind::NegativeAmount
        );
        assert_eq!(
            call_err(&ledger, "mint", &["alice", "lots"]),
            ErrorKind::InvalidAmount
        );
        assert_eq!(
            call_err(&ledger, "balanceOf", &["nobody"]),
            ErrorKind::NotFound
        );
        assert_eq!(
            call_err(&ledger, "transfer", &["a", "b"]),
            ErrorKind::InvalidArgumentCount
        );
        assert_eq!(call_err(&ledger, "burn", &[]), ErrorKind::UnknownOperation);

        // Nothing above touched state
        assert_eq!(call(&ledger, "totalAmount", &[]), b"0");
        assert_eq!(call(&ledger, "queryAllUsers", &[]), br#"{"User":[]}"#);
    }

    #[test]
    fn test_unknown_operation_lists_supported() {
        let storage = Storage::open_temporary().unwrap();
        let ledger = Ledger::new(&storage, LedgerConfig::default());
        ledger.init().unwrap();

        let err = ledger.invoke("burn", &["alice"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("mint"));
        assert!(message.contains("queryAllUsers"));
        assert!(message.contains("deleteUser"));
    }

    #[test]
    fn test_delete_user_via_invoke() {
        let storage = Storage::open_temporary().unwrap();
        let ledger = Ledger::new(&storage, LedgerConfig::default());
        ledger.init().unwrap();

        call(&ledger, "mint", &["alice", "5"]);
        assert_eq!(
            call_err(&ledger, "deleteUser", &["alice"]),
            ErrorKind::BalanceNotZero
        );

        call(&ledger, "withdraw", &["alice", "5"]);
        assert!(call(&ledger, "deleteUser", &["alice"]).is_empty());
        assert_eq!(call_err(&ledger, "balance", &["alice"]), ErrorKind::NotFound);
    }
}
