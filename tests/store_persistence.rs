mod common;

use coinbot::games::{GameEngine, GameKind};
use coinbot::storage::{Mutation, PlayerRecord, PlayerStore, StoreError};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn plays_survive_restart() {
    let (tmp, store) = common::temp_store();
    assert_ok!(store.load().await);
    let engine = GameEngine::new(store.clone());
    engine.apply_reward(77, 400).await;
    let result = assert_ok!(engine.play(77, GameKind::Dice).await);

    let reopened = PlayerStore::new(tmp.path().join("data").join("users.json"));
    assert_ok!(reopened.load().await);
    assert_eq!(reopened.count().await, 1);
    assert_eq!(reopened.get(77).await.balance, result.balance);
}

#[tokio::test]
async fn saved_records_reload_identically() {
    let (tmp, store) = common::temp_store();
    let players: [(u64, PlayerRecord); 4] = [
        (1, PlayerRecord { balance: 0, streak: 0, last_daily_claim: 0 }),
        (22, PlayerRecord { balance: 135, streak: 1, last_daily_claim: 1_700_000_000 }),
        (333, PlayerRecord { balance: 9_999, streak: 12, last_daily_claim: 1_700_086_400 }),
        (u64::MAX, PlayerRecord { balance: 7, streak: 3, last_daily_claim: 1_650_000_000 }),
    ];
    for (id, record) in &players {
        store
            .apply(
                *id,
                &[
                    Mutation::AdjustBalance(record.balance as i64),
                    Mutation::ClaimDaily {
                        at: record.last_daily_claim,
                        streak: record.streak,
                    },
                ],
            )
            .await;
    }
    assert_ok!(store.save().await);

    let reopened = PlayerStore::new(tmp.path().join("data").join("users.json"));
    assert_ok!(reopened.load().await);
    assert_eq!(reopened.count().await, players.len());
    for (id, record) in &players {
        assert_eq!(reopened.get(*id).await, *record, "user {id}");
    }
}

#[tokio::test]
async fn legacy_file_layout_loads() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("users.json");
    std::fs::write(
        &path,
        r#"{"12345": {"coins": 900, "streak": 4, "last_daily": 1700000000}, "99": {}}"#,
    )
    .unwrap();

    let store = PlayerStore::new(&path);
    assert_ok!(store.load().await);
    let record = store.get(12345).await;
    assert_eq!(record.balance, 900);
    assert_eq!(record.streak, 4);
    assert_eq!(record.last_daily_claim, 1_700_000_000);
    assert_eq!(store.get(99).await.balance, 0);
}

#[tokio::test]
async fn corrupt_file_is_not_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("users.json");
    std::fs::write(&path, "{\"1\": {\"coins\": ").unwrap();

    let store = Arc::new(PlayerStore::new(&path));
    let err = assert_err!(store.load().await);
    assert!(matches!(err, StoreError::Format { .. }));
    // file left as found
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\"1\": {\"coins\": "
    );
}

#[tokio::test]
async fn failed_save_keeps_the_play() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let store = Arc::new(PlayerStore::new(blocker.join("users.json")));
    let engine = GameEngine::new(store.clone());

    let result = assert_ok!(engine.play(4, GameKind::Slots).await);
    assert_eq!(store.get(4).await.balance, result.balance);
    assert!(engine.metrics().save_failures() >= 1);
}

#[tokio::test]
async fn mining_never_drives_balance_negative() {
    let (_tmp, store) = common::temp_store();
    let engine = GameEngine::new(store.clone());

    for _ in 0..40 {
        let before = store.get(2).await.balance;
        let result = assert_ok!(engine.play(2, GameKind::Mining).await);
        let expected = if result.balance_delta >= 0 {
            before + result.balance_delta as u64
        } else {
            before.saturating_sub(result.balance_delta.unsigned_abs())
        };
        assert_eq!(result.balance, expected);
    }
}
