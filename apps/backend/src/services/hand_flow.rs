//! Hand flow: start a hand and drive it through pick/pass, bury, call and
//! play until it completes or is redealt.
//!
//! Lock discipline: a hand action holds only the hand lock; house-level
//! follow-ups (redeal, dealer rotation) take only the house lock after the hand
//! lock is released. No path holds both.
//!
//! A finished hand stays in the live store until its house follow-up commits,
//! so a failed follow-up leaves a house that `start_hand` and `leave_house`
//! can still detach from the stale hand.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::events::{publish, OutboundEvent};
use super::houses::{announce_house, detach_stale_hand, discard_hand, load_house};
use super::Backends;
use crate::domain::bidding::{self, PickOutcome};
use crate::domain::hand_init::init_hand;
use crate::domain::snapshot::{hand_private, hand_public};
use crate::domain::tricks::play_card;
use crate::domain::{
    rules_for, Card, HandId, HandState, HouseConfig, HouseId, HouseState, Phase, Seat, Shuffler,
    UserId, VariantRules, CATALOG_SIZE,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::{LockKey, HAND_ID_COUNTER};

pub struct HandFlowService {
    backends: Backends,
    shuffler: Arc<dyn Shuffler>,
    catalog: OnceCell<Vec<Card>>,
}

/// Stakes for the hand dealt after an all-pass.
fn redeal_multiplier(config: &HouseConfig, passed: u32) -> u32 {
    if config.automatic_double {
        passed.saturating_mul(2)
    } else {
        passed
    }
}

fn log_rejection(action: &'static str, hand_id: HandId, user_id: UserId, err: &DomainError) {
    match err {
        DomainError::Invariant(detail) => {
            error!(action, hand_id, user_id, detail = %detail, "Hand invariant violated");
        }
        DomainError::Infra(..) => {
            error!(action, hand_id, user_id, error = %err, "Hand action failed");
        }
        _ => warn!(action, hand_id, user_id, error = %err, "Hand action rejected"),
    }
}

impl HandFlowService {
    pub fn new(backends: Backends, shuffler: Arc<dyn Shuffler>) -> Self {
        Self {
            backends,
            shuffler,
            catalog: OnceCell::new(),
        }
    }

    /// Card catalog, loaded from the durable store on first use.
    async fn catalog(&self) -> Result<&[Card], AppError> {
        let cards = self
            .catalog
            .get_or_try_init(|| async {
                let cards = self.backends.durable.load_catalog().await?;
                info!(cards = cards.len(), "Card catalog loaded");
                Ok::<_, DomainError>(cards)
            })
            .await?;
        Ok(cards.as_slice())
    }

    pub async fn get_hand(&self, hand_id: HandId) -> Result<HandState, AppError> {
        self.backends.live.get_hand(hand_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Hand, format!("Hand {hand_id} not found")).into()
        })
    }

    /// Host-only. Seats the table, shuffles and deals a hand in POP.
    pub async fn start_hand(
        &self,
        house_id: HouseId,
        user_id: UserId,
    ) -> Result<HandState, AppError> {
        let guard = self.backends.locks.lock(LockKey::House(house_id)).await;
        let mut house = load_house(&self.backends, house_id).await?;
        let stale = detach_stale_hand(&self.backends, &mut house).await?;
        house.check_can_start(user_id).inspect_err(|e| {
            warn!(house_id, user_id, error = %e, "start_hand rejected");
        })?;
        // a passed-out hand whose redeal never landed still sets the stakes
        let multiplier = match &stale {
            Some(old) if old.phase == Phase::Pop => redeal_multiplier(&house.config, old.multiplier),
            _ => 1,
        };
        let hand = self.deal_into(&mut house, multiplier).await?;
        drop(guard);
        if let Some(old) = stale {
            discard_hand(&self.backends, old.id).await;
        }

        info!(house_id, hand_id = hand.id, dealer = house.dealer_index, "Hand started");
        self.announce_deal(&house, &hand).await;
        Ok(hand)
    }

    pub async fn pick_or_pass(
        &self,
        hand_id: HandId,
        user_id: UserId,
        pick: bool,
    ) -> Result<HandState, AppError> {
        // House config does not change after creation; read it unlocked.
        let house_id = self.get_hand(hand_id).await?.house_id;
        let nopick_legal = load_house(&self.backends, house_id)
            .await?
            .config
            .nopick_legal;

        let (hand, outcome) = self
            .apply(hand_id, user_id, "pick_or_pass", |hand, _| {
                bidding::pick_or_pass(hand, user_id, pick, nopick_legal)
            })
            .await?;

        match outcome {
            PickOutcome::Picked => info!(hand_id, user_id, "Blind picked"),
            PickOutcome::NoPick => info!(hand_id, "All passed; playing a no-pick hand"),
            PickOutcome::Passed => {}
            PickOutcome::AllPassed => {
                self.announce_action(&hand, user_id).await;
                return match self.redeal(hand.house_id, hand.id, hand.multiplier).await {
                    Ok(next) => Ok(next),
                    Err(err) => {
                        // the pass itself is stored; the next start_hand redeals
                        error!(hand_id, house_id = hand.house_id, error = %err, "Redeal failed");
                        Ok(hand)
                    }
                };
            }
        }
        self.announce_action(&hand, user_id).await;
        Ok(hand)
    }

    pub async fn bury(
        &self,
        hand_id: HandId,
        user_id: UserId,
        cards: &[Card],
    ) -> Result<HandState, AppError> {
        let (hand, call_type) = self
            .apply(hand_id, user_id, "bury", |hand, rules| {
                bidding::bury(hand, user_id, cards, rules)
            })
            .await?;
        debug!(hand_id, user_id, call_type = ?call_type, "Buried");
        self.announce_action(&hand, user_id).await;
        Ok(hand)
    }

    pub async fn call(
        &self,
        hand_id: HandId,
        user_id: UserId,
        card: Card,
    ) -> Result<HandState, AppError> {
        let (hand, called) = self
            .apply(hand_id, user_id, "call", |hand, _| {
                bidding::call(hand, user_id, card)
            })
            .await?;
        info!(hand_id, user_id, called = %called, "Partner card called");
        self.announce_action(&hand, user_id).await;
        Ok(hand)
    }

    pub async fn play(
        &self,
        hand_id: HandId,
        user_id: UserId,
        card: Card,
    ) -> Result<HandState, AppError> {
        let (hand, result) = self
            .apply(hand_id, user_id, "play", |hand, rules| {
                play_card(hand, user_id, card, rules)
            })
            .await?;
        if let Some(taker) = result.trick_taker {
            debug!(hand_id, taker, tricks = hand.tricks.len(), "Trick taken");
        }
        self.announce_action(&hand, user_id).await;

        if result.hand_completed {
            info!(
                hand_id,
                house_id = hand.house_id,
                outcome = ?hand.outcome,
                "Hand completed"
            );
            if let Err(err) = self.finish_hand(hand.house_id, hand.id).await {
                error!(hand_id, house_id = hand.house_id, error = %err, "Finishing hand failed");
            }
        }
        Ok(hand)
    }

    /// Load, mutate and write back one hand under its lock.
    ///
    /// `f` sees the hand and its variant rules; an error leaves the
    /// stored hand untouched.
    async fn apply<T, F>(
        &self,
        hand_id: HandId,
        user_id: UserId,
        action: &'static str,
        f: F,
    ) -> Result<(HandState, T), AppError>
    where
        F: FnOnce(&mut HandState, &'static VariantRules) -> Result<T, DomainError>,
    {
        let guard = self.backends.locks.lock(LockKey::Hand(hand_id)).await;

        let mut hand = self.get_hand(hand_id).await?;
        let expected = hand.version;
        let out = rules_for(hand.variant)
            .and_then(|rules| f(&mut hand, rules))
            .and_then(|out| hand.check_conservation(CATALOG_SIZE).map(|()| out))
            .inspect_err(|e| log_rejection(action, hand_id, user_id, e))?;

        hand.version = self.backends.live.put_hand(&hand, expected).await?;
        drop(guard);

        debug!(
            action,
            hand_id,
            user_id,
            phase = ?hand.phase,
            next_player = hand.next_player,
            "Hand action accepted"
        );
        Ok((hand, out))
    }

    /// Create, persist and attach a fresh hand. Caller holds the house lock.
    async fn deal_into(
        &self,
        house: &mut HouseState,
        multiplier: u32,
    ) -> Result<HandState, AppError> {
        let catalog = self.catalog().await?;
        let hand_id = self.backends.live.next_id(HAND_ID_COUNTER).await?;
        let mut hand = init_hand(hand_id, house, catalog, self.shuffler.as_ref(), multiplier)
            .inspect_err(|e| error!(house_id = house.id, hand_id, error = %e, "Deal failed"))?;

        hand.version = self.backends.live.put_hand(&hand, 0).await?;
        let previous = house.active_hand.replace(hand_id);
        match self.backends.live.put_house(house, house.version).await {
            Ok(version) => house.version = version,
            Err(err) => {
                house.active_hand = previous;
                discard_hand(&self.backends, hand_id).await;
                return Err(err.into());
            }
        }
        Ok(hand)
    }

    /// Everyone passed with no-pick illegal: rotate the dealer and deal again,
    /// doubling the stakes when the house plays automatic doubles.
    async fn redeal(
        &self,
        house_id: HouseId,
        passed_hand: HandId,
        multiplier: u32,
    ) -> Result<HandState, AppError> {
        let guard = self.backends.locks.lock(LockKey::House(house_id)).await;
        let mut house = load_house(&self.backends, house_id).await?;
        if house.active_hand != Some(passed_hand) {
            return Err(DomainError::invariant(format!(
                "house {house_id} moved on from hand {passed_hand} before its redeal"
            ))
            .into());
        }
        house.rotate_dealer();
        let multiplier = redeal_multiplier(&house.config, multiplier);
        let hand = self.deal_into(&mut house, multiplier).await?;
        drop(guard);
        discard_hand(&self.backends, passed_hand).await;

        info!(
            house_id,
            passed_hand,
            hand_id = hand.id,
            multiplier,
            "All passed; hand redealt"
        );
        self.announce_deal(&house, &hand).await;
        Ok(hand)
    }

    /// Detach a completed hand from its house and move the deal on.
    async fn finish_hand(&self, house_id: HouseId, hand_id: HandId) -> Result<(), AppError> {
        let guard = self.backends.locks.lock(LockKey::House(house_id)).await;
        let mut house = load_house(&self.backends, house_id).await?;
        if house.active_hand != Some(hand_id) {
            warn!(house_id, hand_id, active = ?house.active_hand, "Completed hand was not active");
            return Ok(());
        }
        house.active_hand = None;
        house.rotate_dealer();
        house.version = self.backends.live.put_house(&house, house.version).await?;
        drop(guard);
        discard_hand(&self.backends, hand_id).await;

        debug!(house_id, dealer = house.dealer_index, "Dealer rotated");
        announce_house(&self.backends, &house).await;
        Ok(())
    }

    fn seated(hand: &HandState) -> Vec<UserId> {
        hand.players.iter().map(|p| p.user_id).collect()
    }

    async fn send_private(&self, hand: &HandState, seat: Seat) {
        let Some(view) = hand_private(hand, seat) else {
            return;
        };
        let Some(player) = hand.players.get(seat as usize) else {
            return;
        };
        publish(
            self.backends.events.as_ref(),
            &[player.user_id],
            &OutboundEvent::HandPrivate { hand: view },
        )
        .await;
    }

    async fn announce_deal(&self, house: &HouseState, hand: &HandState) {
        for player in &hand.players {
            let mut cards = player.cards.clone();
            cards.sort();
            publish(
                self.backends.events.as_ref(),
                &[player.user_id],
                &OutboundEvent::HandStarted {
                    hand_id: hand.id,
                    house_id: hand.house_id,
                    cards,
                },
            )
            .await;
        }
        publish(
            self.backends.events.as_ref(),
            &Self::seated(hand),
            &OutboundEvent::HandUpdated {
                hand: hand_public(hand),
            },
        )
        .await;
        self.send_private(hand, hand.next_player).await;
        announce_house(&self.backends, house).await;
    }

    /// Public update to the table, then fresh private views for the actor
    /// and for whoever acts next.
    async fn announce_action(&self, hand: &HandState, actor: UserId) {
        publish(
            self.backends.events.as_ref(),
            &Self::seated(hand),
            &OutboundEvent::HandUpdated {
                hand: hand_public(hand),
            },
        )
        .await;
        if hand.phase == Phase::Complete {
            return;
        }
        if let Some(seat) = hand.seat_of(actor) {
            self.send_private(hand, seat).await;
            if seat != hand.next_player {
                self.send_private(hand, hand.next_player).await;
            }
        }
    }
}
