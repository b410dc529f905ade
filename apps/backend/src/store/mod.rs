//! Live keyed store for house and hand documents.
//!
//! This is the system of record for in-progress play. Every write is a
//! compare-and-set on the document version, so an interleaved writer that
//! read a stale copy gets `OPTIMISTIC_LOCK` instead of silently overwriting.

pub mod locks;
pub mod memory;
pub mod redis_store;

use async_trait::async_trait;

use crate::domain::{HandId, HandState, HouseId, HouseState};
use crate::errors::domain::{ConflictKind, DomainError};

pub use locks::{KeyedLocks, LockKey};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Counter used for house ids.
pub const HOUSE_ID_COUNTER: &str = "house_id";
/// Counter used for hand ids.
pub const HAND_ID_COUNTER: &str = "hand_id";

#[async_trait]
pub trait LiveStore: Send + Sync {
    async fn get_house(&self, id: HouseId) -> Result<Option<HouseState>, DomainError>;

    /// Write `house` if the stored version equals `expected_version` (0 when
    /// the house does not exist yet). Returns the new version.
    async fn put_house(&self, house: &HouseState, expected_version: u64)
        -> Result<u64, DomainError>;

    async fn get_hand(&self, id: HandId) -> Result<Option<HandState>, DomainError>;

    /// Same contract as `put_house`.
    async fn put_hand(&self, hand: &HandState, expected_version: u64) -> Result<u64, DomainError>;

    async fn delete_hand(&self, id: HandId) -> Result<(), DomainError>;

    /// Atomically increment `counter` and return the new value.
    async fn next_id(&self, counter: &str) -> Result<i64, DomainError>;
}

pub(crate) fn version_conflict(what: &str, id: i64, expected: u64, found: u64) -> DomainError {
    DomainError::conflict(
        ConflictKind::OptimisticLock,
        format!("{what} {id} changed concurrently: expected version {expected}, found {found}"),
    )
}

pub fn house_key(id: HouseId) -> String {
    format!("house:{id}")
}

pub fn hand_key(id: HandId) -> String {
    format!("hand:{id}")
}
