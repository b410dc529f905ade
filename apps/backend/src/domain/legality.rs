//! Legal-move derivation.
//!
//! Both derivations are pure: they read hand state and return a fresh
//! `Legality` (card → allowed) for one decision point. Nothing is stored on
//! the cards themselves, so an annotation can never leak from one phase into
//! the next.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{Card, ACE_POWER, TEN_POWER};
use crate::domain::cards_logic::hand_has_play_suit;
use crate::domain::state::{HandState, Phase, Role, Seat};

/// Per-card legality for one decision point, keyed by card code on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Legality(BTreeMap<Card, bool>);

impl Legality {
    pub fn from_fn(cards: &[Card], mut allowed: impl FnMut(&Card) -> bool) -> Self {
        Self(cards.iter().map(|c| (*c, allowed(c))).collect())
    }

    pub fn all(cards: &[Card]) -> Self {
        Self::from_fn(cards, |_| true)
    }

    pub fn none(cards: &[Card]) -> Self {
        Self::from_fn(cards, |_| false)
    }

    pub fn is_legal(&self, card: Card) -> bool {
        self.0.get(&card).copied().unwrap_or(false)
    }

    pub fn any(&self) -> bool {
        self.0.values().any(|&ok| ok)
    }

    pub fn legal_cards(&self) -> Vec<Card> {
        self.0
            .iter()
            .filter(|(_, ok)| **ok)
            .map(|(c, _)| *c)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which rung of the call cascade produced the callable cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallType {
    CalledAce,
    UnknownAce,
    CalledTen,
    GoingAlone,
}

/// One rung of the cascade: cards pivot on `pivot_power` (ace or ten) of
/// their effective suit.
#[derive(Debug, Clone, Copy)]
pub struct CallStrategy {
    pub call_type: CallType,
    pub pivot_power: u8,
    pub exclude_trump: bool,
}

/// Cascade order is a rules requirement. The first rung with any callable
/// card wins; if none does, the picker goes alone.
pub const CALL_CASCADE: [CallStrategy; 3] = [
    CallStrategy {
        call_type: CallType::CalledAce,
        pivot_power: ACE_POWER,
        exclude_trump: true,
    },
    CallStrategy {
        call_type: CallType::UnknownAce,
        pivot_power: ACE_POWER,
        exclude_trump: false,
    },
    CallStrategy {
        call_type: CallType::CalledTen,
        pivot_power: TEN_POWER,
        exclude_trump: true,
    },
];

impl CallStrategy {
    /// A card is callable when it is not itself a pivot card, is not filtered
    /// as trump, and the pivot card of its suit is in neither the picker's
    /// hand nor the buried pile.
    pub fn evaluate(&self, hand: &[Card], buried: &[Card]) -> Legality {
        Legality::from_fn(hand, |card| {
            if self.exclude_trump && card.is_trump() {
                return false;
            }
            if card.power() == self.pivot_power {
                return false;
            }
            let suit = card.play_suit();
            !hand
                .iter()
                .chain(buried.iter())
                .any(|c| c.play_suit() == suit && c.power() == self.pivot_power)
        })
    }

    pub fn for_call_type(call_type: CallType) -> Option<CallStrategy> {
        CALL_CASCADE
            .iter()
            .find(|s| s.call_type == call_type)
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    pub call_type: CallType,
    pub legality: Legality,
}

/// Run the call cascade over the picker's hand and the buried pile.
pub fn callable_cards(hand: &[Card], buried: &[Card]) -> CallOptions {
    for strategy in CALL_CASCADE {
        let legality = strategy.evaluate(hand, buried);
        if legality.any() {
            return CallOptions {
                call_type: strategy.call_type,
                legality,
            };
        }
    }
    CallOptions {
        call_type: CallType::GoingAlone,
        legality: Legality::none(hand),
    }
}

/// Trick legality for one player's cards.
///
/// While the called card is out and its suit is led, the partner must play
/// the called card and the picker must play the called suit. Otherwise the
/// normal follow-suit rule applies and a void player may play anything.
pub fn playable_cards(
    cards: &[Card],
    lead: Option<Card>,
    role: Option<Role>,
    called_card: Option<Card>,
    called_card_played: bool,
) -> Legality {
    let Some(lead) = lead else {
        return Legality::all(cards);
    };
    let lead_suit = lead.play_suit();

    if let Some(called) = called_card {
        if !called_card_played && called.play_suit() == lead_suit {
            match role {
                Some(Role::Partner) if cards.contains(&called) => {
                    return Legality::from_fn(cards, |c| *c == called);
                }
                Some(Role::Picker) if hand_has_play_suit(cards, lead_suit) => {
                    return Legality::from_fn(cards, |c| c.play_suit() == lead_suit);
                }
                _ => {}
            }
        }
    }

    if hand_has_play_suit(cards, lead_suit) {
        Legality::from_fn(cards, |c| c.play_suit() == lead_suit)
    } else {
        Legality::all(cards)
    }
}

/// Trick legality for a seat in the current hand.
pub fn playable_for_seat(hand: &HandState, seat: Seat) -> Legality {
    let Some(player) = hand.players.get(seat as usize) else {
        return Legality::default();
    };
    playable_cards(
        &player.cards,
        hand.current_trick.first().map(|p| p.card),
        player.role,
        hand.called_card,
        hand.called_card_played(),
    )
}

/// Legality annotation for whatever decision `seat` faces right now. Seats
/// that are not on turn, and decisions that are not about a card, get an
/// all-false annotation.
pub fn decision_legality(hand: &HandState, seat: Seat) -> Legality {
    let Some(player) = hand.players.get(seat as usize) else {
        return Legality::default();
    };
    if seat != hand.next_player {
        return Legality::none(&player.cards);
    }
    match hand.phase {
        Phase::Pop | Phase::Complete => Legality::none(&player.cards),
        Phase::Bury => Legality::all(&player.cards),
        Phase::Call => callable_cards(&player.cards, &hand.buried).legality,
        Phase::Play => playable_for_seat(hand, seat),
    }
}
