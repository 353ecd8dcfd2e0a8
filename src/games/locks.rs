//! Per-user mutual exclusion with bounded memory.
//!
//! Each user gets a FIFO-fair `tokio::sync::Mutex` created on first use. The table
//! holds one `Arc` per entry and every holder or waiter holds another through its
//! [`Registration`]. When a registration drops and only the table's `Arc` is left, the
//! entry is evicted, so the registry only ever holds users with an operation in flight
//! or queued. This includes waiters that are cancelled before they get the lock.
//!
//! Cloning an entry, releasing it and checking its count all happen under the table's
//! std mutex, which is never held across an `.await`.
use crate::storage::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = HashMap<UserId, Arc<Mutex<()>>>;

#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    table: Arc<StdMutex<LockTable>>,
}

/// One task's claim on a table entry, held from before the wait until release.
#[derive(Debug)]
struct Registration {
    user_id: UserId,
    lock: Option<Arc<Mutex<()>>>,
    table: Arc<StdMutex<LockTable>>,
}

impl Registration {
    /// Register interest in `user_id` and return the entry's mutex to wait on.
    fn new(user_id: UserId, table: &Arc<StdMutex<LockTable>>) -> (Self, Arc<Mutex<()>>) {
        let lock = {
            let mut map = table.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(user_id).or_default().clone()
        };
        let registration = Self {
            user_id,
            lock: Some(lock.clone()),
            table: table.clone(),
        };
        (registration, lock)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut map = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.lock.take());
        if let Some(entry) = map.get(&self.user_id) {
            if Arc::strong_count(entry) == 1 {
                map.remove(&self.user_id);
            }
        }
    }
}

/// Held for the duration of one user's operation. Dropping it releases the user.
#[derive(Debug)]
pub struct UserLockGuard {
    // Field order matters: the mutex is released before the registration is dropped.
    _guard: OwnedMutexGuard<()>,
    registration: Registration,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other operation holds `user_id`, then hold it.
    ///
    /// Cancel-safe: dropping the returned future while it waits gives up the place in
    /// the queue and evicts the entry if nobody else uses it.
    pub async fn acquire(&self, user_id: UserId) -> UserLockGuard {
        let (registration, lock) = Registration::new(user_id, &self.table);
        let guard = lock.lock_owned().await;
        UserLockGuard {
            _guard: guard,
            registration,
        }
    }

    /// Number of users currently holding or waiting on a lock.
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserLockGuard {
    pub fn user_id(&self) -> UserId {
        self.registration.user_id
    }
}
