//! Main token orchestration layer
//!
//! This module ties together state, actor, and metrics components into
//! a high-level API for token operations.
//!
//! # Example
//!
//! ```no_run
//! use token_ledger::{Config, Token};
//!
//! #[tokio::main]
//! async fn main() -> token_ledger::Result<()> {
//!     let config = Config::default();
//!     let token = Token::open(config).await?;
//!
//!     println!("ledger {} supply {}", token.id(), token.total_supply().await?);
//!
//!     token.shutdown().await
//! }
//! ```

use crate::{
    actor::{spawn_ledger_actor, LedgerHandle},
    metrics::Metrics,
    state::LedgerState,
    types::{Account, Amount, EventFilter, EventKind, LedgerId, TokenEvent, TokenInfo},
    Config, Error, Result,
};
use std::time::Instant;

/// Main token ledger interface
#[derive(Debug)]
pub struct Token {
    /// Actor handle for all operations
    handle: LedgerHandle,

    /// Ledger identity (address-equivalent)
    id: LedgerId,

    /// Immutable metadata, cached outside the actor
    info: TokenInfo,

    /// Metrics collector
    metrics: Metrics,
}

impl Token {
    /// Construct the ledger from configuration and spawn its actor.
    ///
    /// The full initial supply is credited to the configured deployer;
    /// this is the only issuance that ever happens.
    pub async fn open(config: Config) -> Result<Self> {
        if config.channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "channel_capacity must be positive".into(),
            ));
        }

        let (initial_supply, info, deployer) = config.token.constructor_args()?;

        let state = LedgerState::construct(initial_supply, info.clone(), deployer)?;
        let id = state.id();

        let metrics = Metrics::new().map_err(|e| Error::Other(e.to_string()))?;
        metrics.set_holders(state.holder_count());

        let handle = spawn_ledger_actor(state, config.channel_capacity);

        tracing::info!(
            ledger = %id,
            name = %info.name,
            symbol = %info.symbol,
            %initial_supply,
            %deployer,
            "token ledger constructed"
        );

        Ok(Self {
            handle,
            id,
            info,
            metrics,
        })
    }

    /// Ledger identity (address-equivalent), for downstream callers.
    pub fn id(&self) -> LedgerId {
        self.id
    }

    /// Immutable token metadata.
    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.info.symbol
    }

    /// Base-unit scale.
    pub fn decimals(&self) -> u32 {
        self.info.decimals
    }

    /// Metrics collector (for scraping).
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Total supply; constant after construction.
    pub async fn total_supply(&self) -> Result<Amount> {
        self.handle.total_supply().await
    }

    /// Balance of `account`; zero for unknown accounts.
    pub async fn balance_of(&self, account: Account) -> Result<Amount> {
        self.handle.balance_of(account).await
    }

    /// Allowance granted by `owner` to `spender`; zero if unset.
    pub async fn allowance(&self, owner: Account, spender: Account) -> Result<Amount> {
        self.handle.allowance(owner, spender).await
    }

    /// Move `amount` from `caller` to `to`.
    ///
    /// Returns the sequence number of the emitted `Transfer` event.
    pub async fn transfer(&self, caller: Account, to: Account, amount: Amount) -> Result<u64> {
        let start = Instant::now();
        let result = self.handle.transfer(caller, to, amount).await;
        self.observe("transfer", start, &result);

        if result.is_ok() {
            self.metrics.record_transfer();
            self.refresh_holders().await;
            tracing::debug!(from = %caller, %to, %amount, "transfer");
        }
        result
    }

    /// Set `spender`'s allowance over `caller`'s balance (absolute
    /// overwrite). Returns the `Approval` event sequence number.
    pub async fn approve(
        &self,
        caller: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<u64> {
        let start = Instant::now();
        let result = self.handle.approve(caller, spender, amount).await;
        self.observe("approve", start, &result);

        if result.is_ok() {
            self.metrics.record_approval();
            tracing::debug!(owner = %caller, %spender, %amount, "approval");
        }
        result
    }

    /// Move `amount` from `owner` to `to` on behalf of `caller`,
    /// consuming `caller`'s allowance.
    pub async fn transfer_from(
        &self,
        caller: Account,
        owner: Account,
        to: Account,
        amount: Amount,
    ) -> Result<u64> {
        let start = Instant::now();
        let result = self.handle.transfer_from(caller, owner, to, amount).await;
        self.observe("transfer_from", start, &result);

        if result.is_ok() {
            self.metrics.record_transfer();
            self.refresh_holders().await;
            tracing::debug!(spender = %caller, %owner, %to, %amount, "delegated transfer");
        }
        result
    }

    /// The full event log, in emission order.
    pub async fn events(&self) -> Result<Vec<TokenEvent>> {
        self.handle.events(EventFilter::all()).await
    }

    /// Events of one kind.
    pub async fn events_by_kind(&self, kind: EventKind) -> Result<Vec<TokenEvent>> {
        self.handle.events(EventFilter::by_kind(kind)).await
    }

    /// Events touching one account.
    pub async fn events_for_account(&self, account: Account) -> Result<Vec<TokenEvent>> {
        self.handle.events(EventFilter::by_account(account)).await
    }

    /// Check the supply conservation invariant.
    ///
    /// Verify that the sum of all balances equals the total supply.
    /// This is the decisive correctness property of the ledger.
    pub async fn check_conservation(&self) -> Result<bool> {
        self.handle.check_conservation().await
    }

    /// Number of accounts with a nonzero balance.
    pub async fn holder_count(&self) -> Result<usize> {
        self.handle.holder_count().await
    }

    /// Shutdown the ledger actor.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }

    /// Balance movements may create or empty accounts; keep the gauge
    /// in step. Best-effort: a closed channel is reported by the
    /// operation itself.
    async fn refresh_holders(&self) {
        if let Ok(count) = self.handle.holder_count().await {
            self.metrics.set_holders(count);
        }
    }

    fn observe(&self, op: &str, start: Instant, result: &Result<u64>) {
        self.metrics.record_op_duration(start.elapsed().as_secs_f64());
        if let Err(e) = result {
            self.metrics.record_rejection();
            tracing::warn!(%op, error = %e, "operation rejected");
        }
    }
}
