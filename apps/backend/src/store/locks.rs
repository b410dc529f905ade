//! Per-id async mutex table.
//!
//! Serializes read-modify-write cycles on one house or one hand inside a
//! process. Different ids never contend. Callers must not hold two guards at
//! once.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{HandId, HouseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    House(HouseId),
    Hand(HandId),
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKey::House(id) => write!(f, "house:{id}"),
            LockKey::Hand(id) => write!(f, "hand:{id}"),
        }
    }
}

#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

/// Exclusive access to one key. Dropping it unlocks and forgets the entry
/// when nobody else holds or waits on it.
pub struct KeyGuard<'a> {
    locks: &'a KeyedLocks,
    key: LockKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // unlock before the idle check so our own Arc is not counted
        drop(self.guard.take());
        self.locks.release_idle(self.key);
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: LockKey) -> KeyGuard<'_> {
        // Clone the Arc out so the dashmap shard is not held across the await.
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        KeyGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Drop the entry for `key` if nobody holds or waits on it.
    fn release_idle(&self, key: LockKey) {
        self.locks
            .remove_if(&key, |_, mutex| Arc::strong_count(mutex) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
