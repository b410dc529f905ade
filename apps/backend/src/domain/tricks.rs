use crate::domain::cards_logic::card_beats;
use crate::domain::cards_types::Card;
use crate::domain::legality::playable_for_seat;
use crate::domain::scoring::score_hand;
use crate::domain::state::{HandState, Phase, Play, Seat, Trick, UserId};
use crate::domain::variants::VariantRules;
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of playing a card, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCardResult {
    /// Whether this play filled the trick.
    pub trick_completed: bool,
    /// Taker of the completed trick, if one was completed.
    pub trick_taker: Option<Seat>,
    /// Whether this play ended the hand.
    pub hand_completed: bool,
}

/// Seat that takes the trick: highest trump if any trump was played, else the
/// highest card of the led suit.
pub fn resolve_trick(plays: &[Play]) -> Option<Seat> {
    let lead = plays.first()?.card.play_suit();
    let mut best = plays.first()?;
    for play in &plays[1..] {
        if card_beats(play.card, best.card, lead) {
            best = play;
        }
    }
    Some(best.seat)
}

/// Play a card into the current trick, enforcing phase, turn and legality.
pub fn play_card(
    hand: &mut HandState,
    user_id: UserId,
    card: Card,
    rules: &VariantRules,
) -> Result<PlayCardResult, DomainError> {
    hand.require_phase(Phase::Play)?;
    let seat = hand.require_turn(user_id)?;

    let pos_opt = hand.player(seat)?.cards.iter().position(|&c| c == card);
    let Some(pos) = pos_opt else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Card not in hand",
        ));
    };
    if !playable_for_seat(hand, seat).is_legal(card) {
        return Err(DomainError::validation(
            ValidationKind::IllegalCard,
            format!("{card} cannot be played now"),
        ));
    }

    let removed = hand.player_mut(seat)?.cards.remove(pos);
    hand.current_trick.push(Play {
        seat,
        user_id,
        card: removed,
    });

    let mut result = PlayCardResult {
        trick_completed: false,
        trick_taker: None,
        hand_completed: false,
    };

    if hand.current_trick.len() < hand.seat_count() {
        hand.next_player = hand.next_seat(seat);
        return Ok(result);
    }

    let plays = std::mem::take(&mut hand.current_trick);
    let taker = resolve_trick(&plays)
        .ok_or_else(|| DomainError::invariant("completed trick has no plays"))?;
    let points = plays.iter().map(|p| u16::from(p.card.points())).sum();
    hand.tricks.push(Trick {
        index: hand.tricks.len() as u8,
        plays,
        taker,
        points,
    });
    hand.next_player = taker;
    result.trick_completed = true;
    result.trick_taker = Some(taker);

    if hand.tricks.len() == rules.tricks_per_hand() {
        hand.outcome = Some(score_hand(hand)?);
        hand.phase = Phase::Complete;
        result.hand_completed = true;
    }
    Ok(result)
}
