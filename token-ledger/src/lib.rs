//! Token Ledger
//!
//! A fungible token ledger: total-supply issuance at construction,
//! per-account balances, direct transfers, and delegated transfers via
//! an allowance mechanism.
//!
//! # Architecture
//!
//! - **Single Writer**: one actor task owns the state; no locks
//! - **Checked Arithmetic**: fixed-width unsigned amounts, never wrap
//! - **Event Log**: one append-only record per successful mutation
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == total_supply for all time
//! - Non-negativity: balances and allowances never go below zero
//! - Atomicity: failed operations leave the state untouched

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod config;
pub mod error;
pub mod metrics;
pub mod state;
pub mod token;
pub mod types;

// Re-exports
pub use config::{Config, TokenConfig};
pub use error::{Error, Result};
pub use state::LedgerState;
pub use token::Token;
pub use types::{
    Account, Amount, EventFilter, EventKind, EventPayload, LedgerId, TokenEvent, TokenInfo,
};
