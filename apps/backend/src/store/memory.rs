//! In-process live store used when no Redis URL is configured and in tests.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{version_conflict, LiveStore};
use crate::domain::{HandId, HandState, HouseId, HouseState};
use crate::errors::domain::DomainError;

#[derive(Default)]
pub struct MemoryStore {
    houses: DashMap<HouseId, HouseState>,
    hands: DashMap<HandId, HandState>,
    counters: DashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}

// Entry holds the shard lock, so check and write are one atomic step.
fn cas_put<K, V>(
    map: &DashMap<K, V>,
    key: K,
    doc: &V,
    expected: u64,
    version_of: fn(&V) -> u64,
    set_version: fn(&mut V, u64),
    what: &str,
) -> Result<u64, DomainError>
where
    K: std::hash::Hash + Eq + Copy + Into<i64>,
    V: Clone,
{
    let next = expected + 1;
    let mut stored = doc.clone();
    set_version(&mut stored, next);
    match map.entry(key) {
        Entry::Occupied(mut occ) => {
            let found = version_of(occ.get());
            if found != expected {
                return Err(version_conflict(what, key.into(), expected, found));
            }
            occ.insert(stored);
        }
        Entry::Vacant(vac) => {
            if expected != 0 {
                return Err(version_conflict(what, key.into(), expected, 0));
            }
            vac.insert(stored);
        }
    }
    Ok(next)
}

#[async_trait]
impl LiveStore for MemoryStore {
    async fn get_house(&self, id: HouseId) -> Result<Option<HouseState>, DomainError> {
        Ok(self.houses.get(&id).map(|h| h.clone()))
    }

    async fn put_house(
        &self,
        house: &HouseState,
        expected_version: u64,
    ) -> Result<u64, DomainError> {
        cas_put(
            &self.houses,
            house.id,
            house,
            expected_version,
            |h| h.version,
            |h, v| h.version = v,
            "house",
        )
    }

    async fn get_hand(&self, id: HandId) -> Result<Option<HandState>, DomainError> {
        Ok(self.hands.get(&id).map(|h| h.clone()))
    }

    async fn put_hand(&self, hand: &HandState, expected_version: u64) -> Result<u64, DomainError> {
        cas_put(
            &self.hands,
            hand.id,
            hand,
            expected_version,
            |h| h.version,
            |h, v| h.version = v,
            "hand",
        )
    }

    async fn delete_hand(&self, id: HandId) -> Result<(), DomainError> {
        self.hands.remove(&id);
        Ok(())
    }

    async fn next_id(&self, counter: &str) -> Result<i64, DomainError> {
        let mut entry = self.counters.entry(counter.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }
}
