//! Card dealing from a shuffled deck.
//!
//! Cards always come off the front of the deck, so who received which card is
//! fully determined by the shuffled order.

use crate::domain::cards_types::Card;
use crate::domain::state::PlayerState;
use crate::domain::variants::{DealStep, VariantRules};
use crate::errors::domain::DomainError;

fn draw(deck: &mut Vec<Card>, n: usize) -> Result<Vec<Card>, DomainError> {
    if deck.len() < n {
        return Err(DomainError::invariant(format!(
            "deck exhausted: need {n} cards, {} left",
            deck.len()
        )));
    }
    Ok(deck.drain(..n).collect())
}

/// Give each player, in order, the next `n` cards from the deck.
pub fn deal_players(
    deck: &mut Vec<Card>,
    players: &mut [PlayerState],
    n: usize,
) -> Result<(), DomainError> {
    let needed = n * players.len();
    if deck.len() < needed {
        return Err(DomainError::invariant(format!(
            "deck exhausted: need {needed} cards for players, {} left",
            deck.len()
        )));
    }
    for player in players.iter_mut() {
        let cards = draw(deck, n)?;
        player.cards.extend(cards);
    }
    Ok(())
}

/// Take the next `n` cards as the blind.
pub fn deal_blind(deck: &mut Vec<Card>, n: usize) -> Result<Vec<Card>, DomainError> {
    draw(deck, n)
}

/// Run the variant's deal steps. Returns the blind. The deck must be used up
/// exactly.
pub fn deal_hand(
    mut deck: Vec<Card>,
    players: &mut [PlayerState],
    rules: &VariantRules,
) -> Result<Vec<Card>, DomainError> {
    if players.len() != rules.player_count {
        return Err(DomainError::invariant(format!(
            "variant {} deals to {} players, got {}",
            rules.id,
            rules.player_count,
            players.len()
        )));
    }
    let mut blind = Vec::with_capacity(rules.blind_size());
    for step in rules.deal {
        match *step {
            DealStep::Players(n) => deal_players(&mut deck, players, n)?,
            DealStep::Blind(n) => blind.extend(deal_blind(&mut deck, n)?),
        }
    }
    if !deck.is_empty() {
        return Err(DomainError::invariant(format!(
            "{} cards left undealt",
            deck.len()
        )));
    }
    Ok(blind)
}
