//! Per-game counters kept in memory for the lifetime of an engine.
//! Not persisted; a summary line is logged by `GameEngine::shutdown` when a command exits.
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameCounter {
    pub plays: u64,
    pub rejections: u64,
    pub coins_paid: u64,
    pub coins_taken: u64,
}

#[derive(Debug, Default)]
pub struct GameMetrics {
    counters: Mutex<BTreeMap<&'static str, GameCounter>>,
    collaborator_failures: AtomicU64,
    save_failures: AtomicU64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_play(&self, slug: &'static str, delta: i64) -> GameCounter {
        let mut guard = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = guard.entry(slug).or_default();
        counter.plays = counter.plays.saturating_add(1);
        if delta >= 0 {
            counter.coins_paid = counter.coins_paid.saturating_add(delta.unsigned_abs());
        } else {
            counter.coins_taken = counter.coins_taken.saturating_add(delta.unsigned_abs());
        }
        *counter
    }

    pub fn record_rejection(&self, slug: &'static str) -> GameCounter {
        let mut guard = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = guard.entry(slug).or_default();
        counter.rejections = counter.rejections.saturating_add(1);
        *counter
    }

    pub fn inc_collaborator_failures(&self) {
        self.collaborator_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_save_failures(&self) {
        self.save_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collaborator_failures(&self) -> u64 {
        self.collaborator_failures.load(Ordering::Relaxed)
    }

    pub fn save_failures(&self) -> u64 {
        self.save_failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, GameCounter> {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// One line, e.g. `dice=3/0 work=1/2 | oracle_failures=0 save_failures=0`
    /// where each pair is plays/rejections.
    pub fn summary_line(&self) -> String {
        let games = self
            .snapshot()
            .iter()
            .map(|(slug, c)| format!("{}={}/{}", slug, c.plays, c.rejections))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} | oracle_failures={} save_failures={}",
            if games.is_empty() { "no plays" } else { games.as_str() },
            self.collaborator_failures(),
            self.save_failures()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_and_rejections_accumulate() {
        let metrics = GameMetrics::new();
        assert!(metrics.snapshot().is_empty());

        let c = metrics.record_play("dice", 80);
        assert_eq!(c.plays, 1);
        assert_eq!(c.coins_paid, 80);
        let c = metrics.record_play("dice", -25);
        assert_eq!(c.plays, 2);
        assert_eq!(c.coins_taken, 25);
        let c = metrics.record_rejection("work");
        assert_eq!(c.rejections, 1);
        assert_eq!(c.plays, 0);

        metrics.inc_collaborator_failures();
        assert_eq!(
            metrics.summary_line(),
            "dice=2/0 work=0/1 | oracle_failures=1 save_failures=0"
        );
    }
}
