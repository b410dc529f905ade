use serde::{Deserialize, Serialize};

use crate::domain::cards_types::Card;
use crate::domain::legality::CallType;
use crate::domain::variants::VariantId;
use crate::errors::domain::{DomainError, ValidationKind};

pub type UserId = i64;
pub type HouseId = i64;
pub type HandId = i64;
/// Turn-order index within a hand (0 = first seat left of the dealer).
pub type Seat = u8;

/// Hand progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Pick-or-pass bidding.
    Pop,
    /// Picker discards into the buried pile.
    Bury,
    /// Picker names the partner card.
    Call,
    /// Trick play.
    Play,
    /// All tricks taken; outcome is set.
    Complete,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Picker,
    Partner,
    Opposition,
}

/// Per-seat state for one hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub user_id: UserId,
    pub seat: Seat,
    pub passed: bool,
    pub role: Option<Role>,
    pub cards: Vec<Card>,
}

impl PlayerState {
    pub fn new(user_id: UserId, seat: Seat) -> Self {
        Self {
            user_id,
            seat,
            passed: false,
            role: None,
            cards: Vec::new(),
        }
    }

    pub fn holds(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub user_id: UserId,
    pub card: Card,
}

/// A completed trick. Completed tricks are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub index: u8,
    pub plays: Vec<Play>,
    pub taker: Seat,
    pub points: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    /// Picker side points (for a no-pick hand: the winning seat's points).
    pub picker_points: u16,
    pub opposition_points: u16,
    pub opposition_win: bool,
    pub winning_score: u16,
    /// Winning seat of a no-pick hand.
    pub leaster_winner: Option<Seat>,
}

/// Authoritative live hand document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandState {
    pub id: HandId,
    pub house_id: HouseId,
    pub variant: VariantId,
    /// Store version for compare-and-set writes.
    pub version: u64,
    pub players: Vec<PlayerState>,
    pub blind: Vec<Card>,
    pub buried: Vec<Card>,
    pub tricks: Vec<Trick>,
    pub current_trick: Vec<Play>,
    pub phase: Phase,
    pub next_player: Seat,
    pub nopick: bool,
    pub call_type: Option<CallType>,
    pub called_card: Option<Card>,
    pub multiplier: u32,
    pub outcome: Option<HandOutcome>,
}

impl HandState {
    pub fn seat_count(&self) -> usize {
        self.players.len()
    }

    /// Seat after `seat`, wrapping.
    pub fn next_seat(&self, seat: Seat) -> Seat {
        let n = self.players.len().max(1);
        ((seat as usize + 1) % n) as Seat
    }

    pub fn seat_of(&self, user_id: UserId) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| p.seat)
    }

    pub fn player(&self, seat: Seat) -> Result<&PlayerState, DomainError> {
        self.players
            .get(seat as usize)
            .ok_or_else(|| DomainError::invariant(format!("seat {seat} out of range")))
    }

    pub fn player_mut(&mut self, seat: Seat) -> Result<&mut PlayerState, DomainError> {
        self.players
            .get_mut(seat as usize)
            .ok_or_else(|| DomainError::invariant(format!("seat {seat} out of range")))
    }

    pub fn seat_with_role(&self, role: Role) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.role == Some(role))
            .map(|p| p.seat)
    }

    pub fn picker(&self) -> Option<Seat> {
        self.seat_with_role(Role::Picker)
    }

    pub fn partner(&self) -> Option<Seat> {
        self.seat_with_role(Role::Partner)
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Complete
    }

    pub fn all_passed(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.passed)
    }

    /// Takes no further actions: completed, or passed around with no pick.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Complete || (self.phase == Phase::Pop && self.all_passed())
    }

    /// Whether anyone has played the called card yet (completed or current trick).
    pub fn called_card_played(&self) -> bool {
        let Some(called) = self.called_card else {
            return false;
        };
        self.tricks
            .iter()
            .flat_map(|t| t.plays.iter())
            .chain(self.current_trick.iter())
            .any(|play| play.card == called)
    }

    pub fn require_phase(&self, expected: Phase) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("Expected phase {expected:?}, hand is in {:?}", self.phase),
            ));
        }
        Ok(())
    }

    /// Resolve the acting user's seat and require that it is their turn.
    pub fn require_turn(&self, user_id: UserId) -> Result<Seat, DomainError> {
        let seat = self.seat_of(user_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::NotSeated,
                format!("User {user_id} is not seated in hand {}", self.id),
            )
        })?;
        if seat != self.next_player {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "Out of turn",
            ));
        }
        Ok(seat)
    }

    /// Every card lives in exactly one place: a player's hand, the blind, the
    /// buried pile, a completed trick or the current trick.
    pub fn check_conservation(&self, catalog_size: usize) -> Result<(), DomainError> {
        let mut all: Vec<Card> = self
            .players
            .iter()
            .flat_map(|p| p.cards.iter().copied())
            .chain(self.blind.iter().copied())
            .chain(self.buried.iter().copied())
            .chain(self.tricks.iter().flat_map(|t| t.plays.iter().map(|p| p.card)))
            .chain(self.current_trick.iter().map(|p| p.card))
            .collect();
        if all.len() != catalog_size {
            return Err(DomainError::invariant(format!(
                "hand {} holds {} cards, expected {catalog_size}",
                self.id,
                all.len()
            )));
        }
        all.sort();
        if all.windows(2).any(|w| w[0] == w[1]) {
            return Err(DomainError::invariant(format!(
                "hand {} holds a duplicated card",
                self.id
            )));
        }
        Ok(())
    }
}
