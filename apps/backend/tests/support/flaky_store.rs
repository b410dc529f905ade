use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sheepshead::domain::{HandId, HandState, HouseId, HouseState};
use sheepshead::errors::domain::{DomainError, InfraErrorKind};
use sheepshead::store::{LiveStore, MemoryStore};

/// In-memory live store whose house writes can be switched off to stand in
/// for a store outage.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_house_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_house_writes(&self, fail: bool) {
        self.fail_house_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LiveStore for FlakyStore {
    async fn get_house(&self, id: HouseId) -> Result<Option<HouseState>, DomainError> {
        self.inner.get_house(id).await
    }

    async fn put_house(
        &self,
        house: &HouseState,
        expected_version: u64,
    ) -> Result<u64, DomainError> {
        if self.fail_house_writes.load(Ordering::SeqCst) {
            return Err(DomainError::infra(
                InfraErrorKind::Store,
                format!("house {} write refused", house.id),
            ));
        }
        self.inner.put_house(house, expected_version).await
    }

    async fn get_hand(&self, id: HandId) -> Result<Option<HandState>, DomainError> {
        self.inner.get_hand(id).await
    }

    async fn put_hand(&self, hand: &HandState, expected_version: u64) -> Result<u64, DomainError> {
        self.inner.put_hand(hand, expected_version).await
    }

    async fn delete_hand(&self, id: HandId) -> Result<(), DomainError> {
        self.inner.delete_hand(id).await
    }

    async fn next_id(&self, counter: &str) -> Result<i64, DomainError> {
        self.inner.next_id(counter).await
    }
}
