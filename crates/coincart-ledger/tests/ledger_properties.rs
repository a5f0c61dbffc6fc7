//! Behavioral properties of the reward ledger: idempotency, conservation,
//! no negative balance, joint visibility, and history ordering.

use assert_matches::assert_matches;
use coincart_core::{
    ActionDescriptor, HistoryFilter, LedgerError, SourceActionId, TransactionKind, UserId,
};
use coincart_effects::{
    FixedClockHandler, FixedIdentityHandler, LatentStoreHandler, MemoryStoreHandler,
    SystemClockHandler, UnavailableStoreHandler,
};
use coincart_ledger::{CreditOutcome, DebitOutcome, LedgerConfig, RewardLedger, SessionLedger};
use proptest::prelude::*;
use std::time::Duration;
use time::macros::datetime;

fn ledger() -> RewardLedger<MemoryStoreHandler, SystemClockHandler> {
    RewardLedger::new(MemoryStoreHandler::new(), SystemClockHandler::new())
}

fn ad(key: &str, reward: u64) -> ActionDescriptor {
    ActionDescriptor::new(key, reward, format!("Watched {key}"))
}

#[tokio::test]
async fn test_fresh_credit_then_duplicate() {
    let ledger = ledger();
    let user = UserId::new();

    let first = ledger
        .credit_for_action(user, ad("ad:nike:v1", 50))
        .await
        .unwrap();
    assert_matches!(first, CreditOutcome::Credited { balance: 50, .. });

    let second = ledger
        .credit_for_action(user, ad("ad:nike:v1", 50))
        .await
        .unwrap();
    assert!(second.is_duplicate());
    assert_eq!(second.balance(), 50);
    assert_eq!(
        first.transaction().transaction_id,
        second.transaction().transaction_id
    );

    let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(ledger.balance_of(user).await.unwrap(), 50);
}

#[tokio::test]
async fn test_distinct_actions_accumulate() {
    let ledger = ledger();
    let user = UserId::new();

    ledger
        .credit_for_action(user, ad("ad:nike:v1", 50))
        .await
        .unwrap();
    let outcome = ledger
        .credit_for_action(user, ad("ad:samsung:v1", 25))
        .await
        .unwrap();

    assert_eq!(outcome.balance(), 75);
    let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_duplicate_keeps_original_transaction() {
    let ledger = ledger();
    let user = UserId::new();

    ledger
        .credit_for_action(user, ad("ad:nike:v1", 50))
        .await
        .unwrap();
    // A buggy caller re-presents the key with a different amount; the
    // original commit wins and nothing changes.
    let replay = ledger
        .credit_for_action(user, ad("ad:nike:v1", 999))
        .await
        .unwrap();

    assert!(replay.is_duplicate());
    assert_eq!(replay.transaction().amount, 50);
    assert_eq!(ledger.balance_of(user).await.unwrap(), 50);
}

#[tokio::test]
async fn test_debit_insufficient_balance() {
    let ledger = ledger();
    let user = UserId::new();
    ledger
        .credit_for_action(user, ad("signup:bonus", 100))
        .await
        .unwrap();

    let err = ledger
        .debit(user, 150, "purchase", None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            requested: 150,
            available: 100
        }
    );
    assert_eq!(ledger.balance_of(user).await.unwrap(), 100);
    let history = ledger.history(user, HistoryFilter::spent()).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_debit_success() {
    let ledger = ledger();
    let user = UserId::new();
    ledger
        .credit_for_action(user, ad("signup:bonus", 100))
        .await
        .unwrap();

    let outcome = ledger.debit(user, 40, "purchase", None).await.unwrap();
    assert_matches!(outcome, DebitOutcome::Debited { balance: 60, .. });

    let spent = ledger.history(user, HistoryFilter::spent()).await.unwrap();
    assert_eq!(spent.len(), 1);
    assert_eq!(spent[0].amount, 40);
    assert_eq!(spent[0].kind, TransactionKind::Spent);
}

#[tokio::test]
async fn test_keyed_debit_replay_is_noop() {
    let ledger = ledger();
    let user = UserId::new();
    ledger
        .credit_for_action(user, ad("signup:bonus", 100))
        .await
        .unwrap();

    let order = SourceActionId::new("order:4711");
    let first = ledger
        .debit(user, 40, "purchase", Some(order.clone()))
        .await
        .unwrap();
    assert_eq!(first.balance(), 60);

    let retried = ledger
        .debit(user, 40, "purchase", Some(order))
        .await
        .unwrap();
    assert!(retried.is_duplicate());
    assert_eq!(retried.balance(), 60);
    assert_eq!(ledger.balance_of(user).await.unwrap(), 60);
}

#[tokio::test]
async fn test_unkeyed_debits_each_deduct() {
    let ledger = ledger();
    let user = UserId::new();
    ledger
        .credit_for_action(user, ad("signup:bonus", 100))
        .await
        .unwrap();

    ledger.debit(user, 30, "purchase", None).await.unwrap();
    let second = ledger.debit(user, 30, "purchase", None).await.unwrap();
    assert_eq!(second.balance(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_credits_commit_once() {
    let ledger = ledger();
    let user = UserId::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .credit_for_action(user, ad("ad:nike:v1", 50))
                .await
                .unwrap()
        }));
    }

    let mut fresh = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            CreditOutcome::Credited { .. } => fresh += 1,
            CreditOutcome::Duplicate { .. } => duplicates += 1,
        }
    }

    assert_eq!(fresh, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(ledger.balance_of(user).await.unwrap(), 50);
    let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_invalid_descriptors_rejected() {
    let ledger = ledger();
    let user = UserId::new();

    let empty_key = ledger
        .credit_for_action(user, ActionDescriptor::new("", 50, "broken"))
        .await
        .unwrap_err();
    assert_matches!(empty_key, LedgerError::InvalidAction { .. });

    let zero_reward = ledger
        .credit_for_action(user, ActionDescriptor::new("ad:x:y", 0, "broken"))
        .await
        .unwrap_err();
    assert_matches!(zero_reward, LedgerError::InvalidAction { .. });

    let zero_debit = ledger.debit(user, 0, "purchase", None).await.unwrap_err();
    assert_matches!(zero_debit, LedgerError::InvalidAction { .. });

    // Nothing reached the store.
    assert!(ledger
        .history(user, HistoryFilter::all())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unavailable_store_surfaces_retryable_error() {
    let ledger = RewardLedger::new(UnavailableStoreHandler::new(), SystemClockHandler::new());
    let user = UserId::new();

    let err = ledger
        .credit_for_action(user, ad("ad:nike:v1", 50))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::StoreUnavailable { .. });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_slow_store_hits_timeout() {
    let store = LatentStoreHandler::new(MemoryStoreHandler::new(), Duration::from_millis(200));
    let config = LedgerConfig::with_store_timeout(Duration::from_millis(20));
    let ledger = RewardLedger::with_config(store, SystemClockHandler::new(), config);
    let user = UserId::new();

    let err = ledger.balance_of(user).await.unwrap_err();
    assert_matches!(err, LedgerError::StoreUnavailable { .. });
}

#[tokio::test]
async fn test_history_ordering_and_filter() {
    let clock = FixedClockHandler::new(datetime!(2025-01-01 00:00:00 UTC));
    let ledger = RewardLedger::new(MemoryStoreHandler::new(), clock.clone());
    let user = UserId::new();

    ledger
        .credit_for_action(user, ad("ad:first", 10))
        .await
        .unwrap();
    clock.advance(time::Duration::minutes(1)).await;
    ledger
        .credit_for_action(user, ad("ad:second", 20))
        .await
        .unwrap();
    clock.advance(time::Duration::minutes(1)).await;
    ledger.debit(user, 5, "sticker", None).await.unwrap();

    let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
    assert_eq!(history.len(), 3);
    for pair in history.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    assert_eq!(history[0].kind, TransactionKind::Spent);

    let earned = ledger.history(user, HistoryFilter::earned()).await.unwrap();
    assert_eq!(earned.len(), 2);

    let recent = ledger
        .history(user, HistoryFilter::all().with_limit(1))
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].amount, 5);
}

#[tokio::test]
async fn test_equal_timestamps_tie_break_deterministic() {
    let clock = FixedClockHandler::new(datetime!(2025-01-01 00:00:00 UTC));
    let ledger = RewardLedger::new(MemoryStoreHandler::new(), clock);
    let user = UserId::new();

    for i in 0..5 {
        ledger
            .credit_for_action(user, ad(&format!("ad:{i}"), 10))
            .await
            .unwrap();
    }

    let a = ledger.history(user, HistoryFilter::all()).await.unwrap();
    let b = ledger.history(user, HistoryFilter::all()).await.unwrap();
    assert_eq!(a, b);
    for pair in a.windows(2) {
        assert!(pair[0].transaction_id < pair[1].transaction_id);
    }
}

#[tokio::test]
async fn test_balance_matches_history_after_each_commit() {
    let ledger = ledger();
    let user = UserId::new();

    ledger
        .credit_for_action(user, ad("signup:bonus", 100))
        .await
        .unwrap();
    ledger.debit(user, 30, "purchase", None).await.unwrap();
    ledger
        .credit_for_action(user, ad("poll:sneakers", 10))
        .await
        .unwrap();

    let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
    let derived: i128 = history.iter().map(|t| t.signed_amount()).sum();
    assert_eq!(derived, i128::from(ledger.balance_of(user).await.unwrap()));
}

#[tokio::test]
async fn test_session_ledger_requires_sign_in() {
    let identity = FixedIdentityHandler::signed_out();
    let session = SessionLedger::new(ledger(), identity.clone());

    let err = session
        .credit_for_action(ad("ad:nike:v1", 50))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::NotAuthenticated);

    let user = UserId::new();
    identity.sign_in(user).await;
    let outcome = session.credit_for_action(ad("ad:nike:v1", 50)).await.unwrap();
    assert_eq!(outcome.balance(), 50);
    assert_eq!(session.balance().await.unwrap(), 50);

    identity.sign_out().await;
    assert_eq!(
        session.balance().await.unwrap_err(),
        LedgerError::NotAuthenticated
    );
}

proptest! {
    // Conservation: whatever interleaving of credits and debits is applied,
    // the balance always equals earned minus spent over committed history,
    // and is never negative.
    #[test]
    fn prop_balance_conserved(ops in proptest::collection::vec((any::<bool>(), 1u64..500), 1..40)) {
        tokio_test::block_on(async move {
            let ledger = ledger();
            let user = UserId::new();

            for (i, (earn, amount)) in ops.into_iter().enumerate() {
                if earn {
                    ledger
                        .credit_for_action(user, ad(&format!("action:{i}"), amount))
                        .await
                        .unwrap();
                } else {
                    // Overdrafts must fail cleanly and change nothing.
                    let before = ledger.balance_of(user).await.unwrap();
                    match ledger.debit(user, amount, "spend", None).await {
                        Ok(outcome) => prop_assert_eq!(outcome.balance(), before - amount),
                        Err(LedgerError::InsufficientBalance { available, .. }) => {
                            prop_assert!(amount > before);
                            prop_assert_eq!(available, before);
                        }
                        Err(other) => {
                            return Err(proptest::test_runner::TestCaseError::fail(format!(
                                "unexpected error: {other}"
                            )))
                        }
                    }
                }

                let balance = ledger.balance_of(user).await.unwrap();
                let history = ledger.history(user, HistoryFilter::all()).await.unwrap();
                let derived: i128 = history.iter().map(|t| t.signed_amount()).sum();
                prop_assert_eq!(derived, i128::from(balance));
            }
            Ok(())
        })?;
    }
}
