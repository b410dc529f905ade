//! Fresh hand creation: seat, shuffle, deal.

use crate::domain::cards_types::Card;
use crate::domain::dealing::deal_hand;
use crate::domain::deck::{shuffled_deck, Shuffler};
use crate::domain::house::HouseState;
use crate::domain::seating::seat_players;
use crate::domain::state::{HandId, HandState, Phase};
use crate::domain::variants::rules_for;
use crate::errors::domain::DomainError;

/// Build the opening state of a hand in POP with seat 0 to act.
pub fn init_hand(
    id: HandId,
    house: &HouseState,
    catalog: &[Card],
    shuffler: &dyn Shuffler,
    multiplier: u32,
) -> Result<HandState, DomainError> {
    let rules = rules_for(house.config.variant)?;
    let mut players = seat_players(&house.player_ids, house.dealer_index)?;
    let deck = shuffled_deck(catalog, shuffler);
    let blind = deal_hand(deck, &mut players, rules)?;

    let hand = HandState {
        id,
        house_id: house.id,
        variant: rules.id,
        version: 0,
        players,
        blind,
        buried: Vec::new(),
        tricks: Vec::new(),
        current_trick: Vec::new(),
        phase: Phase::Pop,
        next_player: 0,
        nopick: false,
        call_type: None,
        called_card: None,
        multiplier,
        outcome: None,
    };
    hand.check_conservation(catalog.len())?;
    Ok(hand)
}
