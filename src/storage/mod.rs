//! # Storage Module - Player Ledger Persistence
//!
//! This module owns the durable side of the coin economy: one [`PlayerRecord`] per
//! user identifier, kept in memory by a [`PlayerStore`] and written out as a single
//! JSON document.
//!
//! ## File Format
//!
//! ```text
//! {
//!   "123456789": { "coins": 420, "streak": 3, "last_daily": 1700000000 },
//!   "987654321": { "coins": 0, "streak": 0, "last_daily": 0 }
//! }
//! ```
//!
//! Keys are string-encoded user identifiers. Missing fields default to zero on load.
//! The whole document is rewritten on every save; there is no incremental format.
//!
//! ## Concurrency
//!
//! Every store operation holds one store-wide async mutex for its duration. That lock
//! protects the mapping itself, not multi-step read-modify-write sequences: callers that
//! read, compute and then write must hold a per-user lock across the whole sequence
//! (see [`crate::games::GameEngine`]).
//!
//! Saves go through [`write_file_locked`]: an `fs2` exclusive lock on the destination,
//! a temp file in the same directory, then an atomic rename. Two saves can never
//! interleave partial writes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coinbot::storage::{Mutation, PlayerStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = PlayerStore::new("data/users.json");
//!     store.load().await?;
//!     store.apply(42, &[Mutation::AdjustBalance(100)]).await;
//!     store.save().await?;
//!     Ok(())
//! }
//! ```

pub mod record;

use fs2::FileExt;
use log::{debug, info};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

pub use record::{Mutation, PlayerRecord, UserId};

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file or its directory could not be read or written.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a valid player document.
    #[error("player file {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory mapping could not be serialized.
    #[error("failed to encode player records: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Durable map of user identifier to [`PlayerRecord`].
///
/// The store is the single writer of its backing file. Records are exclusively owned by
/// the store; callers get copies back and express changes as [`Mutation`]s.
#[derive(Debug)]
pub struct PlayerStore {
    path: PathBuf,
    players: Mutex<HashMap<String, PlayerRecord>>,
}

impl PlayerStore {
    /// Create an empty store backed by `path`. Nothing is read until [`PlayerStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            players: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory mapping with the contents of the backing file.
    ///
    /// A missing file yields an empty mapping and creates the containing directory.
    /// An empty file is treated the same way. A file that exists but does not decode is
    /// a [`StoreError::Format`]; callers must treat that as fatal rather than start over
    /// with an empty ledger.
    pub async fn load(&self) -> Result<(), StoreError> {
        let mut players = self.players.lock().await;
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ensure_parent_dir(&self.path).await?;
                players.clear();
                debug!("player file {} absent; starting empty", self.path.display());
                return Ok(());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let cleaned = raw.trim_start_matches('\0').trim();
        let decoded: HashMap<String, PlayerRecord> = if cleaned.is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(cleaned).map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })?
        };
        *players = decoded;
        info!(
            "Loaded {} player(s) from {}",
            players.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Return a copy of the record for `user_id`, creating a zero-valued one if absent.
    pub async fn get(&self, user_id: UserId) -> PlayerRecord {
        let mut players = self.players.lock().await;
        *players.entry(user_id.to_string()).or_default()
    }

    /// Apply `mutations` in order to the record for `user_id` (created lazily) and return
    /// the resulting record. This does not persist; call [`PlayerStore::save`].
    pub async fn apply(&self, user_id: UserId, mutations: &[Mutation]) -> PlayerRecord {
        let mut players = self.players.lock().await;
        let record = players.entry(user_id.to_string()).or_default();
        for mutation in mutations {
            record.apply(mutation);
        }
        *record
    }

    /// Serialize the whole mapping and overwrite the backing file.
    ///
    /// The store lock is held across encoding and writing, so every save produces a
    /// complete snapshot and concurrent saves are serialized. The file write itself runs
    /// on the blocking pool.
    pub async fn save(&self) -> Result<(), StoreError> {
        let players = self.players.lock().await;
        let content = serde_json::to_string_pretty(&*players)?;
        ensure_parent_dir(&self.path).await?;
        // flock and fsync block; keep them off the async workers
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_file_locked(&path, &content))
            .await
            .map_err(|e| StoreError::io(&self.path, std::io::Error::new(ErrorKind::Other, e)))?
            .map_err(|e| StoreError::io(&self.path, e))?;
        debug!(
            "Saved {} player(s) to {}",
            players.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Number of known user identifiers.
    pub async fn count(&self) -> usize {
        self.players.lock().await.len()
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io(dir, e)),
        _ => Ok(()),
    }
}

/// Write `content` to `path` under an exclusive lock, via temp file and rename.
fn write_file_locked(path: &Path, content: &str) -> std::io::Result<()> {
    use std::fs::{File, OpenOptions};
    use std::io::Write;

    // fs2 has no async API; hold the destination's lock for the duration of the swap
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("users.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    // Persist the rename (best-effort)
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    drop(lock_file);
    Ok(())
}
