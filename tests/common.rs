//! Test utilities & fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use coinbot::games::clock::ManualClock;
use coinbot::games::oracle::{OracleError, TextGenerator};
use coinbot::games::GameEngine;
use coinbot::storage::PlayerStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const T0: i64 = 1_700_000_000;

/// Store backed by a fresh temp dir. Keep the `TempDir` alive for the test's duration.
pub fn temp_store() -> (tempfile::TempDir, Arc<PlayerStore>) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(PlayerStore::new(tmp.path().join("data").join("users.json")));
    (tmp, store)
}

pub fn engine_at(store: Arc<PlayerStore>, start: i64) -> (GameEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let engine = GameEngine::new(store).with_clock(clock.clone());
    (engine, clock)
}

/// Scripted text generator.
pub enum StubOracle {
    Reply(String),
    Fail,
    Hang(Duration),
}

pub struct CountingOracle {
    pub inner: StubOracle,
    pub calls: AtomicUsize,
}

impl CountingOracle {
    pub fn new(inner: StubOracle) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CountingOracle {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            StubOracle::Reply(text) => Ok(text.clone()),
            StubOracle::Fail => Err(OracleError::Status(503)),
            StubOracle::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok("too late".to_string())
            }
        }
    }
}
