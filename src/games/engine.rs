//! Game orchestration: one entry point per user action, serialized per user.
//!
//! Contract:
//! - [`GameEngine::play`] holds the user's lock across read, compute and write, so two
//!   commands from the same user never interleave; other users run concurrently.
//! - A [`GameError`] means nothing was changed. Rule violations carry the text to show;
//!   collaborator failures show a generic retry message and keep the cause for logs.
//! - A failed save does not fail the play. The reward message is still returned and the
//!   failure is logged, since the next load will not see the change.

use super::clock::{Clock, SystemClock};
use super::cooldown::CooldownTracker;
use super::language::{self, Prompt};
use super::locks::UserLocks;
use super::oracle::{OracleError, TextGenerator};
use super::{daily, dice, fishing, mining, slots, work, Outcome, RuleViolation};
use crate::logutil::escape_log;
use crate::metrics::GameMetrics;
use crate::storage::{Mutation, PlayerRecord, PlayerStore, UserId};
use log::{debug, error, info, warn};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default bound on a single collaborator call.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameKind {
    Work,
    Dice,
    Slots,
    Daily,
    Fishing,
    Mining,
    WordChain,
    VietnamesePuzzle,
}

impl GameKind {
    pub const ALL: [GameKind; 8] = [
        GameKind::Work,
        GameKind::Dice,
        GameKind::Slots,
        GameKind::Daily,
        GameKind::Fishing,
        GameKind::Mining,
        GameKind::WordChain,
        GameKind::VietnamesePuzzle,
    ];

    /// Command keyword, also used as the metrics key.
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Work => "work",
            GameKind::Dice => "dice",
            GameKind::Slots => "slots",
            GameKind::Daily => "daily",
            GameKind::Fishing => "fish",
            GameKind::Mining => "mine",
            GameKind::WordChain => "wordchain",
            GameKind::VietnamesePuzzle => "vietking",
        }
    }

    /// Whether this game needs the text-generation collaborator.
    pub fn needs_oracle(self) -> bool {
        matches!(self, GameKind::WordChain | GameKind::VietnamesePuzzle)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game '{0}'")]
pub struct UnknownGame(pub String);

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "work" => GameKind::Work,
            "dice" => GameKind::Dice,
            "slots" | "slot" => GameKind::Slots,
            "daily" => GameKind::Daily,
            "fish" | "fishing" => GameKind::Fishing,
            "mine" | "mining" => GameKind::Mining,
            "wordchain" | "word_chain" => GameKind::WordChain,
            "vietking" | "viet_king" | "puzzle" => GameKind::VietnamesePuzzle,
            _ => return Err(UnknownGame(s.to_string())),
        };
        Ok(kind)
    }
}

/// Successful play, ready for an adapter to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub message: String,
    /// Signed change the game computed (before the zero floor).
    pub balance_delta: i64,
    /// Balance after the change was applied.
    pub balance: u64,
}

#[derive(Debug, Error)]
pub enum GameError {
    /// A game rule refused the play; the text is meant for the user.
    #[error("{0}")]
    RuleViolation(String),

    /// The text-generation collaborator failed or timed out.
    #[error("{message}")]
    CollaboratorFailure {
        message: &'static str,
        #[source]
        source: OracleError,
    },
}

impl GameError {
    /// Text to show the user. Never includes internal error detail.
    pub fn user_message(&self) -> &str {
        match self {
            GameError::RuleViolation(reason) => reason,
            GameError::CollaboratorFailure { message, .. } => message,
        }
    }
}

impl From<RuleViolation> for GameError {
    fn from(v: RuleViolation) -> Self {
        GameError::RuleViolation(v.reason().to_string())
    }
}

/// Coordinates players, games and persistence.
pub struct GameEngine {
    store: Arc<PlayerStore>,
    locks: UserLocks,
    cooldowns: CooldownTracker,
    oracle: Option<Arc<dyn TextGenerator>>,
    oracle_timeout: Duration,
    clock: Arc<dyn Clock>,
    metrics: GameMetrics,
}

impl GameEngine {
    /// Engine over `store` using the system clock and no collaborator.
    pub fn new(store: Arc<PlayerStore>) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
            cooldowns: CooldownTracker::new(work::COOLDOWN_SECS),
            oracle: None,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
            clock: Arc::new(SystemClock),
            metrics: GameMetrics::new(),
        }
    }

    /// Enable the language games with `oracle`.
    pub fn with_oracle(mut self, oracle: Arc<dyn TextGenerator>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<PlayerStore> {
        &self.store
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Snapshot of `user_id`'s record, creating it if this is the first contact.
    pub async fn ensure_ready(&self, user_id: UserId) -> PlayerRecord {
        let _guard = self.locks.acquire(user_id).await;
        self.store.get(user_id).await
    }

    /// Add `delta` to the balance (floored at zero), persist, and return the new record.
    pub async fn apply_reward(&self, user_id: UserId, delta: i64) -> PlayerRecord {
        let _guard = self.locks.acquire(user_id).await;
        let record = self
            .store
            .apply(user_id, &[Mutation::AdjustBalance(delta)])
            .await;
        self.persist().await;
        record
    }

    /// Run one game for `user_id`.
    pub async fn play(&self, user_id: UserId, kind: GameKind) -> Result<GameResult, GameError> {
        let _guard = self.locks.acquire(user_id).await;
        let record = self.store.get(user_id).await;
        let now = self.clock.now();

        let outcome = match self.compute(user_id, kind, &record, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.metrics.record_rejection(kind.slug());
                debug!("user {} {} rejected: {}", user_id, kind, e);
                return Err(e);
            }
        };

        let updated = self.store.apply(user_id, &outcome.mutations).await;
        if kind == GameKind::Work {
            self.cooldowns.mark(user_id, now);
        }
        self.persist().await;
        self.metrics.record_play(kind.slug(), outcome.delta);
        info!(
            "user {} played {}: delta {} balance {} -> {}",
            user_id, kind, outcome.delta, record.balance, updated.balance
        );

        Ok(GameResult {
            message: outcome.message,
            balance_delta: outcome.delta,
            balance: updated.balance,
        })
    }

    /// Final save, e.g. on shutdown.
    pub async fn shutdown(&self) {
        self.persist().await;
        self.cooldowns.prune_expired(self.clock.now());
        info!("Game engine stopped: {}", self.metrics.summary_line());
    }

    async fn compute(
        &self,
        user_id: UserId,
        kind: GameKind,
        record: &PlayerRecord,
        now: i64,
    ) -> Result<Outcome, GameError> {
        match kind {
            GameKind::WordChain => self.word_chain(user_id).await,
            GameKind::VietnamesePuzzle => self.vietnamese_puzzle(user_id).await,
            _ => self.compute_local(user_id, kind, record, now),
        }
    }

    /// Games that need nothing but the record, the clock and randomness.
    fn compute_local(
        &self,
        user_id: UserId,
        kind: GameKind,
        record: &PlayerRecord,
        now: i64,
    ) -> Result<Outcome, GameError> {
        let mut rng = rand::thread_rng();
        let outcome = match kind {
            GameKind::Work => work::play(self.cooldowns.last(user_id), now, &mut rng)?,
            GameKind::Dice => dice::play(&mut rng),
            GameKind::Slots => slots::play(&mut rng),
            GameKind::Daily => daily::play(record, now)?,
            GameKind::Fishing => fishing::play(&mut rng),
            GameKind::Mining => mining::play(&mut rng),
            GameKind::WordChain | GameKind::VietnamesePuzzle => {
                return Err(GameError::RuleViolation(format!(
                    "{kind} cannot be played without the text generator"
                )))
            }
        };
        Ok(outcome)
    }

    async fn word_chain(&self, user_id: UserId) -> Result<Outcome, GameError> {
        let oracle = self
            .oracle
            .as_deref()
            .ok_or_else(|| GameError::RuleViolation(language::WORD_CHAIN_UNCONFIGURED.into()))?;
        let seed = language::pick_seed(&mut rand::thread_rng());
        let prompt = language::word_chain_prompt(seed);

        let sequence = self.generate(oracle, &prompt).await.map_err(|source| {
            self.metrics.inc_collaborator_failures();
            warn!("Word chain generation failed for user {}: {}", user_id, source);
            GameError::CollaboratorFailure {
                message: language::WORD_CHAIN_FAILED,
                source,
            }
        })?;

        let outcome = language::settle_word_chain(seed, &sequence, &mut rand::thread_rng());
        Ok(outcome)
    }

    async fn vietnamese_puzzle(&self, user_id: UserId) -> Result<Outcome, GameError> {
        let oracle = self
            .oracle
            .as_deref()
            .ok_or_else(|| GameError::RuleViolation(language::PUZZLE_UNCONFIGURED.into()))?;
        let prompt = language::puzzle_prompt();

        let challenge = self.generate(oracle, &prompt).await.map_err(|source| {
            self.metrics.inc_collaborator_failures();
            warn!(
                "Vietnamese puzzle generation failed for user {}: {}",
                user_id, source
            );
            GameError::CollaboratorFailure {
                message: language::PUZZLE_FAILED,
                source,
            }
        })?;

        let outcome = language::settle_puzzle(&challenge, &mut rand::thread_rng());
        Ok(outcome)
    }

    async fn generate(
        &self,
        oracle: &dyn TextGenerator,
        prompt: &Prompt,
    ) -> Result<String, OracleError> {
        let call = oracle.generate(prompt.system, &prompt.user, prompt.max_tokens);
        let text = tokio::time::timeout(self.oracle_timeout, call)
            .await
            .map_err(|_| OracleError::Timeout(self.oracle_timeout.as_secs()))??;
        if text.trim().is_empty() {
            return Err(OracleError::EmptyCompletion);
        }
        debug!("Generated text: {}", escape_log(&text));
        Ok(text)
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save().await {
            self.metrics.inc_save_failures();
            error!(
                "Failed to save player data to {}: {} (in-memory changes will be lost on restart)",
                self.store.path().display(),
                e
            );
        }
    }
}
