//! In-memory ledger state
//!
//! `LedgerState` owns the whole accounting state: total supply,
//! per-account balances, per-(owner, spender) allowances, and the
//! append-only event log. Every mutating operation validates all
//! preconditions and computes all new values before writing anything,
//! so a failed operation leaves the state untouched.
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == total_supply at all times
//! - Non-negativity: balances and allowances never underflow
//! - One event per successful mutation, none on failure

use crate::{
    error::{Error, Result},
    types::{Account, Amount, EventFilter, EventPayload, LedgerId, TokenEvent, TokenInfo},
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// The token ledger's owned state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    id: LedgerId,
    info: TokenInfo,
    total_supply: Amount,
    balances: HashMap<Account, Amount>,
    allowances: HashMap<(Account, Account), Amount>,
    events: Vec<TokenEvent>,
}

impl LedgerState {
    /// Construct a ledger with the full supply credited to `deployer`.
    ///
    /// This is the only issuance path; supply never changes afterwards.
    pub fn construct(initial_supply: Amount, info: TokenInfo, deployer: Account) -> Result<Self> {
        if info.name.is_empty() {
            return Err(Error::InvalidConfig("token name must not be empty".into()));
        }
        if info.symbol.is_empty() {
            return Err(Error::InvalidConfig(
                "token symbol must not be empty".into(),
            ));
        }
        if deployer.is_zero() {
            return Err(Error::InvalidConfig(
                "deployer must not be the null account".into(),
            ));
        }

        let id = Self::compute_id(&info, initial_supply, deployer);

        let mut balances = HashMap::new();
        if !initial_supply.is_zero() {
            balances.insert(deployer, initial_supply);
        }

        Ok(Self {
            id,
            info,
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        })
    }

    /// Identity over the canonical encoding of the constructor arguments.
    fn compute_id(info: &TokenInfo, initial_supply: Amount, deployer: Account) -> LedgerId {
        let canonical = bincode::serialize(&(info, initial_supply, deployer))
            .expect("serialization cannot fail");
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        LedgerId::from_bytes(hasher.finalize().into())
    }

    /// Ledger identity (address-equivalent).
    pub fn id(&self) -> LedgerId {
        self.id
    }

    /// Immutable token metadata.
    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    /// Total supply; constant after construction.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`; zero for unknown accounts.
    pub fn balance_of(&self, account: Account) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Allowance granted by `owner` to `spender`; zero if unset.
    pub fn allowance(&self, owner: Account, spender: Account) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Number of accounts with a nonzero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Move `amount` from `caller` to `to`.
    ///
    /// Returns the sequence number of the emitted `Transfer` event.
    pub fn transfer(&mut self, caller: Account, to: Account, amount: Amount) -> Result<u64> {
        if to.is_zero() {
            return Err(Error::InvalidRecipient(to));
        }

        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(Error::InsufficientBalance {
                account: caller,
                balance,
                requested: amount,
            });
        }

        self.apply_move(caller, to, amount)?;

        Ok(self.push_event(EventPayload::Transfer {
            from: caller,
            to,
            amount,
        }))
    }

    /// Set `spender`'s allowance over `caller`'s balance to `amount`.
    ///
    /// Absolute overwrite, never additive; no balance precondition.
    /// Returns the sequence number of the emitted `Approval` event.
    pub fn approve(&mut self, caller: Account, spender: Account, amount: Amount) -> Result<u64> {
        if spender.is_zero() {
            return Err(Error::InvalidRecipient(spender));
        }

        self.set_allowance(caller, spender, amount);

        Ok(self.push_event(EventPayload::Approval {
            owner: caller,
            spender,
            amount,
        }))
    }

    /// Move `amount` from `owner` to `to` on behalf of `caller`,
    /// consuming `caller`'s allowance.
    ///
    /// The allowance is checked before the balance, so "never approved"
    /// and "approved but over-spent" both reject as
    /// [`Error::InsufficientAllowance`] without touching any balance.
    pub fn transfer_from(
        &mut self,
        caller: Account,
        owner: Account,
        to: Account,
        amount: Amount,
    ) -> Result<u64> {
        if to.is_zero() {
            return Err(Error::InvalidRecipient(to));
        }

        let allowance = self.allowance(owner, caller);
        if allowance < amount {
            return Err(Error::InsufficientAllowance {
                owner,
                spender: caller,
                allowance,
                requested: amount,
            });
        }

        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(Error::InsufficientBalance {
                account: owner,
                balance,
                requested: amount,
            });
        }

        let remaining = allowance.checked_sub(amount).ok_or(Error::AmountOverflow)?;

        self.apply_move(owner, to, amount)?;
        self.set_allowance(owner, caller, remaining);

        Ok(self.push_event(EventPayload::Transfer {
            from: owner,
            to,
            amount,
        }))
    }

    /// The full event log, in emission order.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Events matching `filter`, in emission order.
    pub fn events_matching(&self, filter: EventFilter) -> Vec<TokenEvent> {
        self.events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Check the supply conservation invariant.
    ///
    /// Σ(balances) must equal total_supply for all time.
    pub fn check_conservation(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b));
        sum == Some(self.total_supply)
    }

    /// Debit `from` and credit `to`, all-or-nothing.
    ///
    /// Both new balances are computed before either write, so an
    /// arithmetic failure cannot leave a partial mutation. Writing the
    /// debit first keeps a self-transfer a net no-op.
    fn apply_move(&mut self, from: Account, to: Account, amount: Amount) -> Result<()> {
        let new_from = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(Error::AmountOverflow)?;
        let new_to = if from == to {
            new_from.checked_add(amount)
        } else {
            self.balance_of(to).checked_add(amount)
        }
        .ok_or(Error::AmountOverflow)?;

        self.set_balance(from, new_from);
        self.set_balance(to, new_to);
        Ok(())
    }

    /// Zero entries are dropped from the map; absence reads as zero.
    fn set_balance(&mut self, account: Account, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: Account, spender: Account, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn push_event(&mut self, payload: EventPayload) -> u64 {
        let sequence = self.events.len() as u64;
        self.events.push(TokenEvent { sequence, payload });
        sequence
    }
}
