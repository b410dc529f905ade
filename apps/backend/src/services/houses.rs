//! House registry: create, join, leave.

use rand::Rng;
use tracing::{debug, info, warn};

use super::events::{publish, OutboundEvent};
use super::Backends;
use crate::domain::snapshot::house_public;
use crate::domain::{HandId, HandState, HouseConfig, HouseId, HouseState, UserId};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::{LockKey, HOUSE_ID_COUNTER};

pub struct HouseService {
    backends: Backends,
}

impl HouseService {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Create a house hosted (and seated) by `host_id`.
    ///
    /// The durable record is written before the live copy so a live house
    /// always has a configuration record behind it.
    pub async fn create_house(
        &self,
        host_id: UserId,
        config: HouseConfig,
    ) -> Result<HouseState, AppError> {
        config.validate()?;
        let id = self.backends.live.next_id(HOUSE_ID_COUNTER).await?;
        let mut house = HouseState::new(id, host_id, config)?;

        self.backends.durable.record_house(&house).await?;
        house.version = self.backends.live.put_house(&house, 0).await?;

        info!(house_id = id, host_id, variant = %house.config.variant, "House created");
        self.announce(&house).await;
        Ok(house)
    }

    pub async fn get_house(&self, house_id: HouseId) -> Result<HouseState, AppError> {
        load_house(&self.backends, house_id).await
    }

    /// Seat `user_id`. Without an explicit seat the user lands at a random
    /// position in the seat list.
    pub async fn join_house(
        &self,
        house_id: HouseId,
        user_id: UserId,
        seat: Option<usize>,
    ) -> Result<HouseState, AppError> {
        let guard = self.backends.locks.lock(LockKey::House(house_id)).await;
        let mut house = load_house(&self.backends, house_id).await?;

        let seat = seat.unwrap_or_else(|| rand::rng().random_range(0..house.config.player_count));
        let index = house.join(user_id, seat).inspect_err(|e| {
            warn!(house_id, user_id, error = %e, "join rejected");
        })?;
        house.version = self.backends.live.put_house(&house, house.version).await?;
        drop(guard);

        info!(house_id, user_id, index, seated = house.player_ids.len(), "User joined house");
        self.announce(&house).await;
        Ok(house)
    }

    pub async fn leave_house(
        &self,
        house_id: HouseId,
        user_id: UserId,
    ) -> Result<HouseState, AppError> {
        let guard = self.backends.locks.lock(LockKey::House(house_id)).await;
        let mut house = load_house(&self.backends, house_id).await?;

        let stale = detach_stale_hand(&self.backends, &mut house).await?;
        house.leave(user_id).inspect_err(|e| {
            warn!(house_id, user_id, error = %e, "leave rejected");
        })?;
        house.version = self.backends.live.put_house(&house, house.version).await?;
        drop(guard);
        if let Some(hand) = stale {
            discard_hand(&self.backends, hand.id).await;
        }

        info!(house_id, user_id, host_id = house.host_id, "User left house");
        publish(
            self.backends.events.as_ref(),
            &[user_id],
            &OutboundEvent::HouseUpdated {
                house: house_public(&house),
            },
        )
        .await;
        self.announce(&house).await;
        Ok(house)
    }

    async fn announce(&self, house: &HouseState) {
        debug!(house_id = house.id, version = house.version, "Publishing house update");
        announce_house(&self.backends, house).await;
    }
}

pub(crate) async fn load_house(
    backends: &Backends,
    house_id: HouseId,
) -> Result<HouseState, AppError> {
    backends.live.get_house(house_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::House, format!("House {house_id} not found")).into()
    })
}

/// Detach an `active_hand` that is gone or already finished: its house
/// follow-up never committed. Moves the deal on and returns the finished hand
/// if it is still stored. Caller holds the house lock and writes the house.
pub(crate) async fn detach_stale_hand(
    backends: &Backends,
    house: &mut HouseState,
) -> Result<Option<HandState>, AppError> {
    let Some(hand_id) = house.active_hand else {
        return Ok(None);
    };
    match backends.live.get_hand(hand_id).await? {
        Some(hand) if !hand.is_finished() => Ok(None),
        stale => {
            warn!(
                house_id = house.id,
                hand_id,
                stored = stale.is_some(),
                "Detaching stale active hand"
            );
            house.active_hand = None;
            house.rotate_dealer();
            Ok(stale)
        }
    }
}

/// Remove a hand the house no longer points at.
pub(crate) async fn discard_hand(backends: &Backends, hand_id: HandId) {
    if let Err(err) = backends.live.delete_hand(hand_id).await {
        warn!(hand_id, error = %err, "Detached hand left in live store");
    }
}

pub(crate) async fn announce_house(backends: &Backends, house: &HouseState) {
    publish(
        backends.events.as_ref(),
        &house.player_ids,
        &OutboundEvent::HouseUpdated {
            house: house_public(house),
        },
    )
    .await;
}
