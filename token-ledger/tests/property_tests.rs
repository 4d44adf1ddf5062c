//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Supply conservation: Σ(balances) == total_supply
//! - Non-negativity: failed operations leave state unchanged
//! - Approve overwrite: allowances are absolute, never additive
//! - Event correctness: one matching event per successful mutation

use proptest::prelude::*;
use token_ledger::{
    Account, Amount, Config, Error, EventKind, EventPayload, LedgerState, Token, TokenInfo,
};

fn acct(n: u8) -> Account {
    Account::from_bytes([n; 20])
}

fn test_info() -> TokenInfo {
    TokenInfo {
        name: "SampleToken".to_string(),
        symbol: "ST".to_string(),
        decimals: 18,
    }
}

fn fresh_state(supply: u128) -> LedgerState {
    LedgerState::construct(Amount::new(supply), test_info(), acct(1)).unwrap()
}

/// Strategy for generating non-null accounts from a small pool,
/// so operations collide on the same keys often.
fn account_strategy() -> impl Strategy<Value = Account> {
    (1u8..=8).prop_map(acct)
}

/// Strategy for generating amounts around the supply scale
fn amount_strategy() -> impl Strategy<Value = Amount> {
    (0u128..20_000).prop_map(Amount::new)
}

/// One ledger operation
#[derive(Debug, Clone)]
enum Op {
    Transfer(Account, Account, Amount),
    Approve(Account, Account, Amount),
    TransferFrom(Account, Account, Account, Amount),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (account_strategy(), account_strategy(), amount_strategy())
            .prop_map(|(a, b, amt)| Op::Transfer(a, b, amt)),
        (account_strategy(), account_strategy(), amount_strategy())
            .prop_map(|(a, b, amt)| Op::Approve(a, b, amt)),
        (
            account_strategy(),
            account_strategy(),
            account_strategy(),
            amount_strategy()
        )
            .prop_map(|(s, o, t, amt)| Op::TransferFrom(s, o, t, amt)),
    ]
}

fn apply(state: &mut LedgerState, op: &Op) -> Result<u64, Error> {
    match *op {
        Op::Transfer(caller, to, amount) => state.transfer(caller, to, amount),
        Op::Approve(caller, spender, amount) => state.approve(caller, spender, amount),
        Op::TransferFrom(caller, owner, to, amount) => {
            state.transfer_from(caller, owner, to, amount)
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: supply conservation holds after every operation,
    /// successful or not
    #[test]
    fn prop_conservation_under_random_ops(
        supply in 0u128..100_000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut state = fresh_state(supply);
        prop_assert!(state.check_conservation());

        for op in &ops {
            let _ = apply(&mut state, op);
            prop_assert!(state.check_conservation());
        }

        prop_assert_eq!(state.total_supply(), Amount::new(supply));
    }

    /// Property: a rejected operation leaves the state byte-identical
    #[test]
    fn prop_failed_ops_leave_state_unchanged(
        supply in 0u128..100_000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut state = fresh_state(supply);

        for op in &ops {
            let before = state.clone();
            if apply(&mut state, op).is_err() {
                prop_assert_eq!(&state, &before);
            }
        }
    }

    /// Property: no single balance ever exceeds the total supply
    #[test]
    fn prop_balance_bounded_by_supply(
        supply in 0u128..100_000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut state = fresh_state(supply);

        for op in &ops {
            let _ = apply(&mut state, op);
        }

        for n in 1u8..=8 {
            prop_assert!(state.balance_of(acct(n)) <= state.total_supply());
        }
    }

    /// Property: approve overwrites, never accumulates
    #[test]
    fn prop_approve_overwrites(
        first in amount_strategy(),
        second in amount_strategy(),
        owner in account_strategy(),
        spender in account_strategy(),
    ) {
        let mut state = fresh_state(1_000_000);

        state.approve(owner, spender, first).unwrap();
        state.approve(owner, spender, second).unwrap();

        prop_assert_eq!(state.allowance(owner, spender), second);
    }

    /// Property: each successful operation emits exactly one event whose
    /// fields match the call
    #[test]
    fn prop_events_match_operations(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut state = fresh_state(1_000_000);

        for op in &ops {
            let events_before = state.events().len();
            let result = apply(&mut state, op);
            let events_after = state.events().len();

            match result {
                Ok(seq) => {
                    prop_assert_eq!(events_after, events_before + 1);
                    let event = &state.events()[events_before];
                    prop_assert_eq!(event.sequence, seq);

                    let expected = match *op {
                        Op::Transfer(from, to, amount) =>
                            EventPayload::Transfer { from, to, amount },
                        Op::Approve(owner, spender, amount) =>
                            EventPayload::Approval { owner, spender, amount },
                        Op::TransferFrom(_, owner, to, amount) =>
                            EventPayload::Transfer { from: owner, to, amount },
                    };
                    prop_assert_eq!(&event.payload, &expected);
                }
                Err(_) => prop_assert_eq!(events_after, events_before),
            }
        }
    }

    /// Property: transfer_from never consumes allowance on failure
    #[test]
    fn prop_allowance_untouched_on_failure(
        granted in amount_strategy(),
        requested in amount_strategy(),
    ) {
        let mut state = fresh_state(1_000_000);
        state.approve(acct(1), acct(2), granted).unwrap();

        let result = state.transfer_from(acct(2), acct(1), acct(3), requested);
        if result.is_err() {
            prop_assert_eq!(state.allowance(acct(1), acct(2)), granted);
        } else {
            prop_assert_eq!(
                state.allowance(acct(1), acct(2)),
                granted.checked_sub(requested).unwrap()
            );
        }
    }
}

mod scenario_tests {
    use super::*;

    fn scenario_config() -> Config {
        let mut config = Config::default();
        config.token.deployer = acct(1).to_string();
        config
    }

    async fn open_token() -> Token {
        Token::open(scenario_config()).await.unwrap()
    }

    fn units(n: u64) -> Amount {
        Amount::from_units(n, 18).unwrap()
    }

    #[tokio::test]
    async fn test_construction_scenario() {
        let token = open_token().await;
        let deployer = acct(1);

        assert_eq!(token.total_supply().await.unwrap(), units(1000));
        assert_eq!(token.balance_of(deployer).await.unwrap(), units(1000));
        assert_eq!(token.name(), "SampleToken");
        assert_eq!(token.symbol(), "ST");

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_transfer_scenario() {
        let token = open_token().await;
        let (deployer, user1) = (acct(1), acct(2));

        token.transfer(deployer, user1, units(10)).await.unwrap();

        assert_eq!(token.balance_of(user1).await.unwrap(), units(10));
        assert_eq!(token.balance_of(deployer).await.unwrap(), units(990));

        let transfers = token.events_by_kind(EventKind::Transfer).await.unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(
            transfers[0].payload,
            EventPayload::Transfer {
                from: deployer,
                to: user1,
                amount: units(10),
            }
        );

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_approve_then_transfer_from_scenario() {
        let token = open_token().await;
        let (deployer, user1) = (acct(1), acct(2));

        token.approve(deployer, user1, units(20)).await.unwrap();
        token
            .transfer_from(user1, deployer, user1, units(5))
            .await
            .unwrap();

        assert_eq!(token.balance_of(user1).await.unwrap(), units(5));
        assert_eq!(
            token.allowance(deployer, user1).await.unwrap(),
            units(15)
        );

        let approvals = token.events_by_kind(EventKind::Approval).await.unwrap();
        assert_eq!(approvals.len(), 1);
        assert_eq!(
            approvals[0].payload,
            EventPayload::Approval {
                owner: deployer,
                spender: user1,
                amount: units(20),
            }
        );

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unapproved_transfer_from_rejected() {
        let token = open_token().await;
        let (deployer, user1) = (acct(1), acct(2));

        let err = token
            .transfer_from(user1, deployer, user1, units(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientAllowance { .. }));

        // No state change
        assert_eq!(token.balance_of(user1).await.unwrap(), Amount::ZERO);
        assert_eq!(token.balance_of(deployer).await.unwrap(), units(1000));
        assert!(token.events().await.unwrap().is_empty());

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_over_allowance_transfer_from_rejected() {
        let token = open_token().await;
        let (deployer, user1) = (acct(1), acct(2));

        token.approve(deployer, user1, units(20)).await.unwrap();

        // Balance would suffice; allowance does not
        let err = token
            .transfer_from(user1, deployer, user1, units(40))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientAllowance { .. }));

        assert_eq!(token.allowance(deployer, user1).await.unwrap(), units(20));
        assert_eq!(token.balance_of(user1).await.unwrap(), Amount::ZERO);

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_event_log_filters_by_account() {
        let token = open_token().await;
        let (deployer, user1, user2) = (acct(1), acct(2), acct(3));

        token.transfer(deployer, user1, units(10)).await.unwrap();
        token.transfer(deployer, user2, units(10)).await.unwrap();
        token.approve(user1, user2, units(1)).await.unwrap();

        let for_user1 = token.events_for_account(user1).await.unwrap();
        assert_eq!(for_user1.len(), 2);

        let for_user2 = token.events_for_account(user2).await.unwrap();
        assert_eq!(for_user2.len(), 2);

        let all = token.events().await.unwrap();
        assert_eq!(all.len(), 3);
        // Sequence numbers are strictly increasing
        assert!(all.windows(2).all(|w| w[0].sequence < w[1].sequence));

        token.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_conservation_after_mixed_traffic() {
        let token = open_token().await;
        let deployer = acct(1);

        for n in 2u8..10 {
            token
                .transfer(deployer, acct(n), units(n as u64))
                .await
                .unwrap();
        }
        token.approve(deployer, acct(2), units(50)).await.unwrap();
        token
            .transfer_from(acct(2), deployer, acct(3), units(25))
            .await
            .unwrap();

        assert!(token.check_conservation().await.unwrap());
        assert_eq!(token.total_supply().await.unwrap(), units(1000));

        token.shutdown().await.unwrap();
    }
}
