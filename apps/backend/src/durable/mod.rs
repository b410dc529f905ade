//! Durable relational store: house configuration records and the card catalog.
//!
//! Consulted at house creation and deck bootstrap only. Hand actions never
//! touch it.

pub mod memory;
pub mod sea;

use async_trait::async_trait;

use crate::domain::{Card, HouseState};
use crate::errors::domain::DomainError;

pub use memory::MemoryDurable;
pub use sea::SeaDurable;

#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Persist the configuration record of a newly created house.
    async fn record_house(&self, house: &HouseState) -> Result<(), DomainError>;

    /// Load the card catalog. Implementations validate it against the
    /// built-in 32-card catalog before returning.
    async fn load_catalog(&self) -> Result<Vec<Card>, DomainError>;
}
