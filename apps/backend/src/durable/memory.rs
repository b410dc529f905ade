use async_trait::async_trait;
use parking_lot::Mutex;

use super::DurableStore;
use crate::domain::deck::validate_catalog;
use crate::domain::{catalog, Card, HouseState};
use crate::errors::domain::DomainError;

/// In-process durable store holding the built-in catalog.
pub struct MemoryDurable {
    cards: Vec<Card>,
    houses: Mutex<Vec<HouseState>>,
}

impl Default for MemoryDurable {
    fn default() -> Self {
        Self::with_catalog(catalog())
    }
}

impl MemoryDurable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an arbitrary catalog; loading fails unless it is the real one.
    pub fn with_catalog(cards: Vec<Card>) -> Self {
        Self {
            cards,
            houses: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_houses(&self) -> Vec<HouseState> {
        self.houses.lock().clone()
    }
}

#[async_trait]
impl DurableStore for MemoryDurable {
    async fn record_house(&self, house: &HouseState) -> Result<(), DomainError> {
        self.houses.lock().push(house.clone());
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Vec<Card>, DomainError> {
        validate_catalog(&self.cards)?;
        Ok(self.cards.clone())
    }
}
