//! Core types for the token ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (checked fixed-width unsigned integers)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identifier: an opaque 20-byte value.
///
/// Accounts have no structure beyond identity; the all-zero account is
/// the null account and is never a valid recipient or spender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account([u8; 20]);

impl Account {
    /// The null account.
    pub const ZERO: Account = Account([0u8; 20]);

    /// Create an account from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True for the null account.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        let bytes: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Token amount in base units.
///
/// Unsigned and fixed-width; every arithmetic operation that could wrap
/// goes through the checked methods so an overflowing operation rejects
/// instead of truncating.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create from raw base units.
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw base units.
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// True if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole tokens scaled by `decimals`, e.g. `from_units(10, 18)` is
    /// ten tokens at the conventional 18-decimal scale.
    ///
    /// Returns `None` if the scaled value does not fit.
    pub fn from_units(whole: u64, decimals: u32) -> Option<Self> {
        let scale = 10u128.checked_pow(decimals)?;
        (whole as u128).checked_mul(scale).map(Self)
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u128>().map(Amount)
    }
}

/// Immutable token metadata fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Human-readable token name.
    pub name: String,

    /// Short ticker symbol.
    pub symbol: String,

    /// Base-unit scale (conventionally 18).
    pub decimals: u32,
}

/// Ledger identity: SHA-256 over the canonical encoding of the
/// constructor arguments. This is the address-equivalent a deployment
/// collaborator publishes for downstream callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerId([u8; 32]);

impl LedgerId {
    /// Create from a raw hash.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw hash bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Event kind, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Balance movement (direct or delegated).
    Transfer,
    /// Allowance grant or overwrite.
    Approval,
}

/// Payload of a ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// `amount` moved from `from` to `to`.
    Transfer {
        /// Debited account.
        from: Account,
        /// Credited account.
        to: Account,
        /// Amount moved.
        amount: Amount,
    },
    /// `owner` set `spender`'s allowance to `amount`.
    Approval {
        /// Granting account.
        owner: Account,
        /// Authorized spender.
        spender: Account,
        /// New absolute allowance.
        amount: Amount,
    },
}

/// A record in the observable event log.
///
/// Events are append-only; `sequence` is assigned by the ledger and
/// strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEvent {
    /// Position in the log, starting at 0.
    pub sequence: u64,

    /// What happened.
    pub payload: EventPayload,
}

impl TokenEvent {
    /// Event kind.
    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::Transfer { .. } => EventKind::Transfer,
            EventPayload::Approval { .. } => EventKind::Approval,
        }
    }

    /// True if `account` appears in any field of the payload.
    pub fn touches(&self, account: Account) -> bool {
        match self.payload {
            EventPayload::Transfer { from, to, .. } => from == account || to == account,
            EventPayload::Approval { owner, spender, .. } => {
                owner == account || spender == account
            }
        }
    }
}

/// Filter for event log queries. Empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Restrict to one event kind.
    pub kind: Option<EventKind>,

    /// Restrict to events touching one account.
    pub account: Option<Account>,
}

impl EventFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to `kind`.
    pub fn by_kind(kind: EventKind) -> Self {
        Self {
            kind: Some(kind),
            account: None,
        }
    }

    /// Restrict to events touching `account`.
    pub fn by_account(account: Account) -> Self {
        Self {
            kind: None,
            account: Some(account),
        }
    }

    /// Apply the filter to one event.
    pub fn matches(&self, event: &TokenEvent) -> bool {
        if let Some(kind) = self.kind {
            if event.kind() != kind {
                return false;
            }
        }
        if let Some(account) = self.account {
            if !event.touches(account) {
                return false;
            }
        }
        true
    }
}
