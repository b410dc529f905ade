//! Domain layer: pure hand rules, types and helpers. No I/O.

pub mod bidding;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod deck;
pub mod hand_init;
pub mod house;
pub mod legality;
pub mod scoring;
pub mod seating;
pub mod snapshot;
pub mod state;
pub mod tricks;
pub mod variants;

#[cfg(test)]
mod tests_bidding;
#[cfg(test)]
mod tests_playable;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, hand_has_play_suit};
pub use cards_types::{catalog, Card, PlaySuit, Rank, Suit, CATALOG_SIZE};
pub use deck::{OsShuffler, Shuffler};
pub use house::{HouseConfig, HouseState};
pub use legality::{CallType, Legality};
pub use state::{HandId, HandState, HouseId, Phase, Role, Seat, UserId};
pub use variants::{rules_for, VariantId, VariantRules};
