//! Public snapshot API for observing hand and house state without exposing
//! private cards.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::Card;
use crate::domain::house::{HouseConfig, HouseState};
use crate::domain::legality::{decision_legality, CallType, Legality};
use crate::domain::state::{
    HandId, HandOutcome, HandState, HouseId, Phase, Play, Role, Seat, Trick, UserId,
};

/// Public info about a single seat in a hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: Seat,
    pub user_id: UserId,
    pub passed: bool,
    pub card_count: usize,
    /// Picker is always public; the partner only after the called card is out.
    pub role: Option<Role>,
}

/// Hand state every seated player may see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandPublic {
    pub hand_id: HandId,
    pub house_id: HouseId,
    pub phase: Phase,
    pub next_player: Seat,
    pub seats: Vec<SeatPublic>,
    pub blind_size: usize,
    pub buried_count: usize,
    pub tricks: Vec<Trick>,
    pub current_trick: Vec<Play>,
    pub nopick: bool,
    pub call_type: Option<CallType>,
    pub called_card: Option<Card>,
    pub multiplier: u32,
    pub outcome: Option<HandOutcome>,
}

/// One player's own cards and what they may do with them right now.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandPrivate {
    pub hand_id: HandId,
    pub seat: Seat,
    pub cards: Vec<Card>,
    pub legal: Legality,
}

/// House state shown to seated users and HTTP callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HousePublic {
    pub house_id: HouseId,
    pub host_id: UserId,
    pub config: HouseConfig,
    pub player_ids: Vec<UserId>,
    pub dealer_index: usize,
    pub active_hand: Option<HandId>,
}

fn public_role(hand: &HandState, role: Option<Role>) -> Option<Role> {
    match role {
        Some(Role::Picker) => Some(Role::Picker),
        Some(Role::Partner) | Some(Role::Opposition)
            if hand.called_card_played() || hand.phase == Phase::Complete =>
        {
            role
        }
        // Going alone: everyone else is known opposition.
        Some(Role::Opposition) if hand.called_card.is_none() => role,
        _ => None,
    }
}

pub fn hand_public(hand: &HandState) -> HandPublic {
    HandPublic {
        hand_id: hand.id,
        house_id: hand.house_id,
        phase: hand.phase,
        next_player: hand.next_player,
        seats: hand
            .players
            .iter()
            .map(|p| SeatPublic {
                seat: p.seat,
                user_id: p.user_id,
                passed: p.passed,
                card_count: p.cards.len(),
                role: public_role(hand, p.role),
            })
            .collect(),
        blind_size: hand.blind.len(),
        buried_count: hand.buried.len(),
        tricks: hand.tricks.clone(),
        current_trick: hand.current_trick.clone(),
        nopick: hand.nopick,
        call_type: hand.call_type,
        called_card: hand.called_card,
        multiplier: hand.multiplier,
        outcome: hand.outcome,
    }
}

pub fn hand_private(hand: &HandState, seat: Seat) -> Option<HandPrivate> {
    let player = hand.players.get(seat as usize)?;
    let mut cards = player.cards.clone();
    cards.sort();
    Some(HandPrivate {
        hand_id: hand.id,
        seat,
        cards,
        legal: decision_legality(hand, seat),
    })
}

pub fn house_public(house: &HouseState) -> HousePublic {
    HousePublic {
        house_id: house.id,
        host_id: house.host_id,
        config: house.config.clone(),
        player_ids: house.player_ids.clone(),
        dealer_index: house.dealer_index,
        active_hand: house.active_hand,
    }
}
