//! Ledger operations and argument validation.
//!
//! Callers address the ledger with an operation name and a list of string
//! arguments. [`Operation::parse`] turns that pair into a typed operation,
//! rejecting bad arity, bad identifiers, and bad amounts before anything
//! touches the store.

use crate::account::AccountId;
use thiserror::Error;

/// Operation names accepted by [`Operation::parse`].
pub const SUPPORTED_OPERATIONS: &[&str] = &[
    "mint",
    "balanceOf",
    "balance",
    "withdraw",
    "transfer",
    "totalAmount",
    "queryAllUsers",
    "deleteUser",
];

/// Errors raised while validating operation arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("incorrect number of arguments for {operation}: expecting {expected}, got {got}")]
    InvalidArgumentCount {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid account name: {0:?} is reserved")]
    ReservedName(String),

    #[error("account name can't be empty")]
    EmptyAccount,

    #[error("amount can't be negative: {0}")]
    NegativeAmount(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("unknown operation {name:?}, expecting one of: {}", SUPPORTED_OPERATIONS.join(", "))]
    UnknownOperation { name: String },
}

/// Parse a caller-supplied decimal amount.
///
/// Negative values are reported separately from text that is not a number
/// at all.
pub fn parse_amount(text: &str) -> Result<u64, ValidationError> {
    if let Some(digits) = text.strip_prefix('-') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidAmount(text.to_string()));
        }
        // "-0" is still zero
        if digits.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ValidationError::NegativeAmount(text.to_string()));
    }
    text.parse::<u64>()
        .map_err(|_| ValidationError::InvalidAmount(text.to_string()))
}

/// A validated ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Mint { account: AccountId, amount: u64 },
    BalanceOf { account: AccountId },
    Withdraw { account: AccountId, amount: u64 },
    Transfer { from: AccountId, to: AccountId, amount: u64 },
    TotalAmount,
    QueryAllUsers,
    DeleteUser { account: AccountId },
}

impl Operation {
    /// Build an operation from its name and string arguments.
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Self, ValidationError> {
        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();

        let op = match name {
            "mint" => {
                expect_args("mint", &args, 2)?;
                Operation::Mint {
                    account: AccountId::new(args[0])?,
                    amount: parse_amount(args[1])?,
                }
            }
            "balanceOf" | "balance" => {
                expect_args("balanceOf", &args, 1)?;
                Operation::BalanceOf {
                    account: AccountId::new(args[0])?,
                }
            }
            "withdraw" => {
                expect_args("withdraw", &args, 2)?;
                Operation::Withdraw {
                    account: AccountId::new(args[0])?,
                    amount: parse_amount(args[1])?,
                }
            }
            "transfer" => {
                expect_args("transfer", &args, 3)?;
                Operation::Transfer {
                    from: AccountId::new(args[0])?,
                    to: AccountId::new(args[1])?,
                    amount: parse_amount(args[2])?,
                }
            }
            "totalAmount" => {
                expect_args("totalAmount", &args, 0)?;
                Operation::TotalAmount
            }
            "queryAllUsers" => {
                expect_args("queryAllUsers", &args, 0)?;
                Operation::QueryAllUsers
            }
            "deleteUser" => {
                expect_args("deleteUser", &args, 1)?;
                Operation::DeleteUser {
                    account: AccountId::new(args[0])?,
                }
            }
            _ => {
                return Err(ValidationError::UnknownOperation {
                    name: name.to_string(),
                })
            }
        };

        Ok(op)
    }

    /// Canonical operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Mint { .. } => "mint",
            Operation::BalanceOf { .. } => "balanceOf",
            Operation::Withdraw { .. } => "withdraw",
            Operation::Transfer { .. } => "transfer",
            Operation::TotalAmount => "totalAmount",
            Operation::QueryAllUsers => "queryAllUsers",
            Operation::DeleteUser { .. } => "deleteUser",
        }
    }

    /// Check if this operation only reads state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Operation::BalanceOf { .. } | Operation::TotalAmount | Operation::QueryAllUsers
        )
    }
}

fn expect_args(operation: &'static str, args: &[&str], expected: usize) -> Result<(), ValidationError> {
    if args.len() != expected {
        return Err(ValidationError::InvalidArgumentCount {
            operation,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0"), Ok(0));
        assert_eq!(parse_amount("100"), Ok(100));
        assert_eq!(parse_amount("18446744073709551615"), Ok(u64::MAX));

        assert!(matches!(
            parse_amount("-5"),
            Err(ValidationError::NegativeAmount(_))
        ));
        assert!(matches!(
            parse_amount("ten"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(""),
            Err(ValidationError::InvalidAmount(_))
        ));
        // Too large for u64 but not negative
        assert!(matches!(
            parse_amount("18446744073709551616"),
            Err(ValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_amount_signs() {
        assert_eq!(parse_amount("-0"), Ok(0));
        assert_eq!(parse_amount("-000"), Ok(0));

        // Negative no matter how many digits
        assert!(matches!(
            parse_amount("-99999999999999999999999999999999999999999999"),
            Err(ValidationError::NegativeAmount(_))
        ));

        for text in ["-", "--5", "-5x", "- 5"] {
            assert!(
                matches!(parse_amount(text), Err(ValidationError::InvalidAmount(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_parse_mint() {
        let op = Operation::parse("mint", &["alice", "100"]).unwrap();
        assert_eq!(
            op,
            Operation::Mint {
                account: id("alice"),
                amount: 100
            }
        );
        assert_eq!(op.name(), "mint");
        assert!(!op.is_read_only());
    }

    #[test]
    fn test_parse_balance_alias() {
        let a = Operation::parse("balance", &["alice"]).unwrap();
        let b = Operation::parse("balanceOf", &["alice"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name(), "balanceOf");
        assert!(a.is_read_only());
    }

    #[test]
    fn test_parse_transfer() {
        let op = Operation::parse("transfer", &["alice", "bob", "40"]).unwrap();
        assert_eq!(
            op,
            Operation::Transfer {
                from: id("alice"),
                to: id("bob"),
                amount: 40
            }
        );
    }

    #[test]
    fn test_parse_no_arg_operations() {
        let none: [&str; 0] = [];
        assert_eq!(
            Operation::parse("totalAmount", &none).unwrap(),
            Operation::TotalAmount
        );
        assert_eq!(
            Operation::parse("queryAllUsers", &none).unwrap(),
            Operation::QueryAllUsers
        );
    }

    #[test]
    fn test_argument_count() {
        let result = Operation::parse("transfer", &["alice", "bob"]);
        assert_eq!(
            result,
            Err(ValidationError::InvalidArgumentCount {
                operation: "transfer",
                expected: 3,
                got: 2
            })
        );

        assert!(matches!(
            Operation::parse("totalAmount", &["extra"]),
            Err(ValidationError::InvalidArgumentCount { expected: 0, .. })
        ));
        assert!(matches!(
            Operation::parse("deleteUser", &["a", "b"]),
            Err(ValidationError::InvalidArgumentCount { expected: 1, .. })
        ));
    }

    #[test]
    fn test_reserved_name_rejected() {
        assert!(matches!(
            Operation::parse("mint", &["Total", "100"]),
            Err(ValidationError::ReservedName(_))
        ));
        assert!(matches!(
            Operation::parse("transfer", &["alice", "Total", "1"]),
            Err(ValidationError::ReservedName(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(matches!(
            Operation::parse("withdraw", &["alice", "-1"]),
            Err(ValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_unknown_operation() {
        let err = Operation::parse("burn", &["alice"]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownOperation { .. }));

        let message = err.to_string();
        for name in SUPPORTED_OPERATIONS {
            assert!(message.contains(name), "missing {} in {}", name, message);
        }
    }
}
