//! House (table) state: configuration, seat list, host and dealer rotation.

use serde::{Deserialize, Serialize};

use crate::domain::state::{HandId, HouseId, UserId};
use crate::domain::variants::{rules_for, VariantId};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Who may take a seat or watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserGroup {
    Anyone,
    Friends,
    Nobody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseConfig {
    pub variant: VariantId,
    pub player_count: usize,
    /// Whether an all-pass hand is played as a no-pick (leaster) hand.
    pub nopick_legal: bool,
    /// Double the stakes of the next hand after an all-pass redeal.
    pub automatic_double: bool,
    pub blitz_legal: bool,
    pub crack_legal: bool,
    pub chat_enabled: bool,
    pub players_permitted: UserGroup,
    pub spectators_permitted: UserGroup,
}

impl HouseConfig {
    /// Five-handed called ace with the usual toggles.
    pub fn five_handed_called_ace() -> Self {
        Self {
            variant: VariantId::G5HCA,
            player_count: 5,
            nopick_legal: true,
            automatic_double: false,
            blitz_legal: false,
            crack_legal: false,
            chat_enabled: true,
            players_permitted: UserGroup::Anyone,
            spectators_permitted: UserGroup::Anyone,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let rules = rules_for(self.variant)?;
        if self.player_count != rules.player_count {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfig,
                format!(
                    "{} is played by {} players, not {}",
                    self.variant, rules.player_count, self.player_count
                ),
            ));
        }
        Ok(())
    }
}

/// Live house document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseState {
    pub id: HouseId,
    pub host_id: UserId,
    pub config: HouseConfig,
    /// Seated users in table order.
    pub player_ids: Vec<UserId>,
    pub dealer_index: usize,
    pub active_hand: Option<HandId>,
    /// Store version for compare-and-set writes.
    pub version: u64,
}

impl HouseState {
    /// New house with only the host seated.
    pub fn new(id: HouseId, host_id: UserId, config: HouseConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            id,
            host_id,
            config,
            player_ids: vec![host_id],
            dealer_index: 0,
            active_hand: None,
            version: 0,
        })
    }

    pub fn is_full(&self) -> bool {
        self.player_ids.len() >= self.config.player_count
    }

    pub fn is_seated(&self, user_id: UserId) -> bool {
        self.player_ids.contains(&user_id)
    }

    /// Seat `user_id` at `seat mod (seated + 1)`.
    pub fn join(&mut self, user_id: UserId, seat: usize) -> Result<usize, DomainError> {
        if self.is_full() {
            return Err(DomainError::conflict(
                ConflictKind::HouseFull,
                format!("House {} is full", self.id),
            ));
        }
        if self.is_seated(user_id) {
            return Err(DomainError::conflict(
                ConflictKind::AlreadySeated,
                format!("User {user_id} is already seated in house {}", self.id),
            ));
        }
        let index = seat % (self.player_ids.len() + 1);
        self.player_ids.insert(index, user_id);
        if index <= self.dealer_index && self.player_ids.len() > 1 {
            // keep the same user as dealer
            self.dealer_index += 1;
        }
        Ok(index)
    }

    pub fn leave(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.active_hand.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::HandInProgress,
                format!("House {} has a hand in progress", self.id),
            ));
        }
        let Some(index) = self.player_ids.iter().position(|&id| id == user_id) else {
            return Err(DomainError::validation(
                ValidationKind::NotSeated,
                format!("User {user_id} is not seated in house {}", self.id),
            ));
        };
        self.player_ids.remove(index);

        if self.player_ids.is_empty() {
            self.dealer_index = 0;
        } else {
            if index < self.dealer_index {
                self.dealer_index -= 1;
            }
            if self.dealer_index >= self.player_ids.len() {
                self.dealer_index = 0;
            }
            if self.host_id == user_id {
                self.host_id = self.player_ids[0];
            }
        }
        Ok(())
    }

    /// Host-only, with a full table and no hand running.
    pub fn check_can_start(&self, user_id: UserId) -> Result<(), DomainError> {
        if self.host_id != user_id {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host can start a hand",
            ));
        }
        if let Some(hand_id) = self.active_hand {
            return Err(DomainError::conflict(
                ConflictKind::HandInProgress,
                format!("Hand {hand_id} is still in progress"),
            ));
        }
        if self.player_ids.len() != self.config.player_count {
            return Err(DomainError::conflict(
                ConflictKind::HouseNotReady,
                format!(
                    "{} of {} seats filled",
                    self.player_ids.len(),
                    self.config.player_count
                ),
            ));
        }
        Ok(())
    }

    pub fn rotate_dealer(&mut self) {
        if !self.player_ids.is_empty() {
            self.dealer_index = (self.dealer_index + 1) % self.player_ids.len();
        }
    }
}
