//! Error types for the token ledger

use crate::types::{Account, Amount};
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed constructor arguments; fatal, no ledger is produced
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Balance below the requested transfer amount
    #[error("Insufficient balance: account {account} holds {balance}, requested {requested}")]
    InsufficientBalance {
        /// Debited account
        account: Account,
        /// Current balance
        balance: Amount,
        /// Requested amount
        requested: Amount,
    },

    /// Granted allowance below the requested amount
    #[error(
        "Insufficient allowance: {spender} may spend {allowance} of {owner}'s balance, \
         requested {requested}"
    )]
    InsufficientAllowance {
        /// Granting account
        owner: Account,
        /// Spending account
        spender: Account,
        /// Current allowance
        allowance: Amount,
        /// Requested amount
        requested: Amount,
    },

    /// Destination or spender account is the null account
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Account),

    /// Checked arithmetic would wrap; the whole operation is rejected
    #[error("Amount arithmetic overflow")]
    AmountOverflow,

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
