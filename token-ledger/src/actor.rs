//! Actor-based concurrency for the ledger
//!
//! Single-writer pattern over Tokio message passing: one task owns the
//! `LedgerState` outright, so conflicting mutations on the same account
//! serialize through the mailbox and no lock is needed. Reads route
//! through the same mailbox and therefore always observe a consistent
//! snapshot relative to in-flight writes.
//!
//! ```text
//! callers ──► LedgerHandle (Clone) ──mpsc──► LedgerActor ──► LedgerState
//!                       ◄──────── oneshot replies ────────┘
//! ```

use crate::{
    error::{Error, Result},
    state::LedgerState,
    types::{Account, Amount, EventFilter, TokenEvent},
};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the ledger actor
pub enum LedgerMessage {
    /// Direct transfer from `caller` to `to`
    Transfer {
        /// Debited account
        caller: Account,
        /// Credited account
        to: Account,
        /// Amount to move
        amount: Amount,
        /// Reply channel; Ok carries the event sequence number
        response: oneshot::Sender<Result<u64>>,
    },

    /// Set `spender`'s allowance over `caller`'s balance
    Approve {
        /// Granting account
        caller: Account,
        /// Authorized spender
        spender: Account,
        /// New absolute allowance
        amount: Amount,
        /// Reply channel
        response: oneshot::Sender<Result<u64>>,
    },

    /// Delegated transfer consuming `caller`'s allowance over `owner`
    TransferFrom {
        /// Spending account
        caller: Account,
        /// Account whose balance is debited
        owner: Account,
        /// Credited account
        to: Account,
        /// Amount to move
        amount: Amount,
        /// Reply channel
        response: oneshot::Sender<Result<u64>>,
    },

    /// Read a balance; never fails
    BalanceOf {
        /// Queried account
        account: Account,
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Read an allowance; never fails
    Allowance {
        /// Granting account
        owner: Account,
        /// Spender
        spender: Account,
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Read the total supply; never fails
    TotalSupply {
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Query the event log
    Events {
        /// Kind/account filter
        filter: EventFilter,
        /// Reply channel
        response: oneshot::Sender<Vec<TokenEvent>>,
    },

    /// Verify Σ(balances) == total_supply
    CheckConservation {
        /// Reply channel
        response: oneshot::Sender<bool>,
    },

    /// Number of accounts with a nonzero balance
    HolderCount {
        /// Reply channel
        response: oneshot::Sender<usize>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the ledger state and processes messages
pub struct LedgerActor {
    state: LedgerState,
    mailbox: mpsc::Receiver<LedgerMessage>,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(state: LedgerState, mailbox: mpsc::Receiver<LedgerMessage>) -> Self {
        Self { state, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if matches!(msg, LedgerMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
        }
        tracing::debug!("ledger actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::Transfer {
                caller,
                to,
                amount,
                response,
            } => {
                let _ = response.send(self.state.transfer(caller, to, amount));
            }

            LedgerMessage::Approve {
                caller,
                spender,
                amount,
                response,
            } => {
                let _ = response.send(self.state.approve(caller, spender, amount));
            }

            LedgerMessage::TransferFrom {
                caller,
                owner,
                to,
                amount,
                response,
            } => {
                let _ = response.send(self.state.transfer_from(caller, owner, to, amount));
            }

            LedgerMessage::BalanceOf { account, response } => {
                let _ = response.send(self.state.balance_of(account));
            }

            LedgerMessage::Allowance {
                owner,
                spender,
                response,
            } => {
                let _ = response.send(self.state.allowance(owner, spender));
            }

            LedgerMessage::TotalSupply { response } => {
                let _ = response.send(self.state.total_supply());
            }

            LedgerMessage::Events { filter, response } => {
                let _ = response.send(self.state.events_matching(filter));
            }

            LedgerMessage::CheckConservation { response } => {
                let _ = response.send(self.state.check_conservation());
            }

            LedgerMessage::HolderCount { response } => {
                let _ = response.send(self.state.holder_count());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        msg: LedgerMessage,
        rx: oneshot::Receiver<T>,
    ) -> Result<T> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Direct transfer; Ok carries the event sequence number
    pub async fn transfer(&self, caller: Account, to: Account, amount: Amount) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Transfer {
                caller,
                to,
                amount,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Set an allowance
    pub async fn approve(
        &self,
        caller: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Approve {
                caller,
                spender,
                amount,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Delegated transfer
    pub async fn transfer_from(
        &self,
        caller: Account,
        owner: Account,
        to: Account,
        amount: Amount,
    ) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::TransferFrom {
                caller,
                owner,
                to,
                amount,
                response: tx,
            },
            rx,
        )
        .await?
    }

    /// Read a balance
    pub async fn balance_of(&self, account: Account) -> Result<Amount> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::BalanceOf { account, response: tx }, rx)
            .await
    }

    /// Read an allowance
    pub async fn allowance(&self, owner: Account, spender: Account) -> Result<Amount> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Allowance {
                owner,
                spender,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Read the total supply
    pub async fn total_supply(&self) -> Result<Amount> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::TotalSupply { response: tx }, rx)
            .await
    }

    /// Query the event log
    pub async fn events(&self, filter: EventFilter) -> Result<Vec<TokenEvent>> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::Events { filter, response: tx }, rx)
            .await
    }

    /// Verify the conservation invariant
    pub async fn check_conservation(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::CheckConservation { response: tx }, rx)
            .await
    }

    /// Number of accounts with a nonzero balance
    pub async fn holder_count(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::HolderCount { response: tx }, rx)
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(state: LedgerState, channel_capacity: usize) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(channel_capacity); // Bounded channel for backpressure
    let actor = LedgerActor::new(state, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}
