//! # Coinbot - Chat Bot Coin Economy
//!
//! Coinbot keeps a per-user coin balance and lets users earn or lose coins through
//! mini-games driven by chat commands.
//!
//! ## Features
//!
//! - **Mini-Games**: Work (cooldown), Dice, Slots, Daily (streak), Fishing, Mining, plus two
//!   language games (WordChain, Vietnamese puzzle) backed by a text-generation endpoint.
//! - **Per-User Serialization**: every action for one user runs under that user's lock;
//!   different users play concurrently.
//! - **Durable Ledger**: balances live in a JSON file rewritten atomically after each change.
//! - **Async Design**: built with Tokio; the text-generation call is bounded by a timeout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use coinbot::games::{GameEngine, GameKind};
//! use coinbot::storage::PlayerStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(PlayerStore::new("data/users.json"));
//!     store.load().await?;
//!     let engine = GameEngine::new(store);
//!
//!     match engine.play(42, GameKind::Dice).await {
//!         Ok(result) => println!("{} (balance {})", result.message, result.balance),
//!         Err(e) => println!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`games`] - engine, reward tables and the individual mini-games
//! - [`storage`] - player records and the persistent store
//! - [`bot`] - command parsing, reply texts and the line-oriented console adapter
//! - [`config`] - configuration file and environment overrides
//! - [`metrics`] - in-process play counters
//! - [`logutil`] - log-safe rendering of generated text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Bot adapter   │ ← commands in, replies out
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameEngine    │ ← locking, rules, text generation
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   PlayerStore   │ ← JSON persistence
//! └─────────────────┘
//! ```

pub mod bot;
pub mod config;
pub mod games;
pub mod logutil;
pub mod metrics;
pub mod storage;
