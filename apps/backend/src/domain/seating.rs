//! Turn order for a new hand.

use crate::domain::state::{PlayerState, Seat, UserId};
use crate::errors::domain::DomainError;

/// Players in turn order, starting with the seat left of the dealer and
/// wrapping around the house's seat list. Deterministic; no randomness.
pub fn seat_players(
    player_ids: &[UserId],
    dealer_index: usize,
) -> Result<Vec<PlayerState>, DomainError> {
    let count = player_ids.len();
    if count == 0 {
        return Err(DomainError::invariant("cannot seat an empty house"));
    }
    if dealer_index >= count {
        return Err(DomainError::invariant(format!(
            "dealer index {dealer_index} outside {count} seats"
        )));
    }
    let first = (dealer_index + 1) % count;
    Ok((0..count)
        .map(|i| PlayerState::new(player_ids[(first + i) % count], i as Seat))
        .collect())
}
