use serde::{Deserialize, Serialize};

/// Opaque numeric user identifier supplied by the chat adapter.
pub type UserId = u64;

/// Persistent state tracked per player.
///
/// Field names on disk are `coins`, `streak` and `last_daily`; any that are missing
/// decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Coin balance. Never negative; updates that would go below zero stop at zero.
    #[serde(rename = "coins", default)]
    pub balance: u64,
    /// Consecutive daily claims.
    #[serde(default)]
    pub streak: u32,
    /// Unix seconds of the last successful daily claim; 0 means never claimed.
    #[serde(rename = "last_daily", default)]
    pub last_daily_claim: i64,
}

/// A single, explicit change to a [`PlayerRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Add a signed amount to the balance, clamped at zero.
    AdjustBalance(i64),
    /// Record a successful daily claim at `at` with the resulting streak.
    ClaimDaily { at: i64, streak: u32 },
}

impl PlayerRecord {
    pub fn apply(&mut self, mutation: &Mutation) {
        match *mutation {
            Mutation::AdjustBalance(delta) => {
                self.balance = clamp_balance(self.balance, delta);
            }
            Mutation::ClaimDaily { at, streak } => {
                self.last_daily_claim = at;
                self.streak = streak;
            }
        }
    }

    pub fn has_claimed_daily(&self) -> bool {
        self.last_daily_claim != 0
    }
}

/// `balance + delta`, floored at zero and saturating at `u64::MAX`.
pub fn clamp_balance(balance: u64, delta: i64) -> u64 {
    if delta >= 0 {
        balance.saturating_add(delta.unsigned_abs())
    } else {
        balance.saturating_sub(delta.unsigned_abs())
    }
}
