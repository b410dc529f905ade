//! Outbound events and the sink the services publish them through.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::snapshot::{HandPrivate, HandPublic, HousePublic};
use crate::domain::{Card, HandId, HouseId, UserId};
use crate::errors::domain::DomainError;

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// A player's own cards for a freshly dealt hand.
    HandStarted {
        hand_id: HandId,
        house_id: HouseId,
        cards: Vec<Card>,
    },
    HandUpdated {
        hand: HandPublic,
    },
    HandPrivate {
        hand: HandPrivate,
    },
    HouseUpdated {
        house: HousePublic,
    },
}

/// Delivers events to every live connection of a user.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, user_id: UserId, event: OutboundEvent) -> Result<(), DomainError>;
}

/// Send `event` to each of `users`. Delivery is best effort: the state change
/// is already persisted, so failures are logged and dropped.
pub async fn publish(sink: &dyn EventSink, users: &[UserId], event: &OutboundEvent) {
    for &user_id in users {
        if let Err(err) = sink.send(user_id, event.clone()).await {
            warn!(user_id, error = %err, "event delivery failed");
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn send(&self, _user_id: UserId, _event: OutboundEvent) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Sink that keeps every event in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(UserId, OutboundEvent)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<(UserId, OutboundEvent)> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn for_user(&self, user_id: UserId) -> Vec<OutboundEvent> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| *to == user_id)
            .map(|(_, ev)| ev.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send(&self, user_id: UserId, event: OutboundEvent) -> Result<(), DomainError> {
        self.sent.lock().push((user_id, event));
        Ok(())
    }
}
