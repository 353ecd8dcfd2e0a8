//! Process-local per-user cooldowns (used by Work).
//!
//! Timestamps live only in memory: a restart makes every user ready again. Entries are
//! pruned once their window has passed so the map stays bounded by recently active users.
use crate::storage::UserId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct CooldownTracker {
    period_secs: i64,
    last_play: Mutex<HashMap<UserId, i64>>,
}

impl CooldownTracker {
    pub fn new(period_secs: i64) -> Self {
        Self {
            period_secs,
            last_play: Mutex::new(HashMap::new()),
        }
    }

    pub fn period_secs(&self) -> i64 {
        self.period_secs
    }

    /// Last successful play for `user_id`, if still tracked.
    pub fn last(&self, user_id: UserId) -> Option<i64> {
        self.last_play
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .copied()
    }

    /// Seconds left before `user_id` may play again; `None` when ready.
    pub fn remaining(&self, user_id: UserId, now: i64) -> Option<i64> {
        let last = self.last(user_id)?;
        let left = last + self.period_secs - now;
        (left > 0).then_some(left)
    }

    pub fn mark(&self, user_id: UserId, now: i64) {
        let mut map = self.last_play.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(user_id, now);
        // Opportunistic pruning keeps the map small without a background task
        if map.len() > 1024 {
            let period = self.period_secs;
            map.retain(|_, t| now - *t < period);
        }
    }

    /// Forget the cooldown for `user_id`.
    pub fn reset(&self, user_id: UserId) {
        self.last_play
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id);
    }

    /// Drop every entry whose window has elapsed at `now`.
    pub fn prune_expired(&self, now: i64) {
        let period = self.period_secs;
        self.last_play
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, t| now - *t < period);
    }

    pub fn len(&self) -> usize {
        self.last_play
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
