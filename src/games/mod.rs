//! # Games - Reward Engine and Mini-Games
//!
//! Everything that turns a user's command into coins lives here.
//!
//! ## Components
//!
//! - [`engine`] - [`GameEngine`]: per-user locking, dispatch, persistence, error mapping
//! - [`reward`] - weighted outcome tables shared by the variants
//! - [`work`], [`dice`], [`slots`], [`daily`], [`fishing`], [`mining`], [`language`] - one
//!   module per mini-game
//! - [`locks`] - bounded per-user lock registry
//! - [`cooldown`] - process-local Work cooldowns
//! - [`oracle`] - text-generation collaborator capability
//! - [`clock`] - injectable time source
//!
//! ## Flow
//!
//! ```text
//! caller ──► GameEngine::play(user, kind)
//!              │ acquire per-user lock
//!              │ PlayerStore::get
//!              │ variant::play(record, now, rng [, generated text]) ──► Outcome
//!              │ PlayerStore::apply(mutations) + save
//!              ▼ release lock
//!            GameResult { message, balance_delta, balance }
//! ```
//!
//! Variant modules are plain functions: they read a record snapshot, draw randomness
//! from the `Rng` they are handed, and describe the change as an [`Outcome`]. They never
//! touch the store, so they are deterministic under a seeded RNG.

pub mod clock;
pub mod cooldown;
pub mod daily;
pub mod dice;
pub mod engine;
pub mod fishing;
pub mod language;
pub mod locks;
pub mod mining;
pub mod oracle;
pub mod reward;
pub mod slots;
pub mod work;

use crate::storage::Mutation;
use thiserror::Error;

pub use engine::{GameEngine, GameError, GameKind, GameResult};

/// What a successful play produces: the narrative, the signed coin change it reports,
/// and the record changes to persist.
///
/// `delta` is the computed result (a Mining run can be negative); the balance itself is
/// clamped at zero when the mutations are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub delta: i64,
    pub mutations: Vec<Mutation>,
}

impl Outcome {
    /// An outcome whose only effect is a balance adjustment of `delta`.
    pub fn adjust(message: String, delta: i64) -> Self {
        Self {
            message,
            delta,
            mutations: vec![Mutation::AdjustBalance(delta)],
        }
    }
}

/// A game rule refused the play (cooldown active, already claimed, ...).
/// The text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleViolation(String);

impl RuleViolation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}
