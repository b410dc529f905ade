//! Pick-or-pass, bury and partner call.
//!
//! Each action validates everything before touching state, so a rejected
//! action leaves the hand exactly as it was.

use crate::domain::cards_types::{catalog, Card};
use crate::domain::legality::{callable_cards, CallStrategy, CallType};
use crate::domain::state::{HandState, Phase, Role, UserId};
use crate::domain::variants::{CallRule, VariantRules};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Actor took the blind; same actor now buries.
    Picked,
    /// Actor passed; turn moved on.
    Passed,
    /// Everyone passed and no-pick is legal; play starts at seat 0.
    NoPick,
    /// Everyone passed and no-pick is not legal; the hand stays in POP.
    AllPassed,
}

pub fn pick_or_pass(
    hand: &mut HandState,
    user_id: UserId,
    pick: bool,
    nopick_legal: bool,
) -> Result<PickOutcome, DomainError> {
    hand.require_phase(Phase::Pop)?;
    if hand.all_passed() {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("Everyone passed on hand {}; it is waiting for a redeal", hand.id),
        ));
    }
    let seat = hand.require_turn(user_id)?;

    if pick {
        let blind = std::mem::take(&mut hand.blind);
        let player = hand.player_mut(seat)?;
        player.passed = false;
        player.role = Some(Role::Picker);
        player.cards.extend(blind);
        hand.phase = Phase::Bury;
        return Ok(PickOutcome::Picked);
    }

    hand.player_mut(seat)?.passed = true;
    if !hand.all_passed() {
        hand.next_player = hand.next_seat(seat);
        return Ok(PickOutcome::Passed);
    }

    if nopick_legal {
        hand.nopick = true;
        hand.phase = Phase::Play;
        hand.next_player = 0;
        Ok(PickOutcome::NoPick)
    } else {
        Ok(PickOutcome::AllPassed)
    }
}

/// Move `cards` from the picker's hand to the buried pile, then decide
/// whether a partner call follows.
pub fn bury(
    hand: &mut HandState,
    user_id: UserId,
    cards: &[Card],
    rules: &VariantRules,
) -> Result<Option<CallType>, DomainError> {
    hand.require_phase(Phase::Bury)?;
    let seat = hand.require_turn(user_id)?;

    if cards.len() != rules.bury_count {
        return Err(DomainError::validation(
            ValidationKind::WrongCardCount,
            format!("Bury exactly {} cards, got {}", rules.bury_count, cards.len()),
        ));
    }
    for (i, card) in cards.iter().enumerate() {
        if cards[..i].contains(card) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateCard,
                format!("{card} listed twice"),
            ));
        }
    }
    let player = hand.player(seat)?;
    if let Some(missing) = cards.iter().find(|c| !player.holds(**c)) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{missing} is not in hand"),
        ));
    }

    let player = hand.player_mut(seat)?;
    player.cards.retain(|c| !cards.contains(c));
    hand.buried.extend_from_slice(cards);

    match rules.call_rule {
        CallRule::NoCall => {
            assign_opposition(hand);
            start_play(hand);
            Ok(None)
        }
        CallRule::CalledAce => {
            let options = callable_cards(&hand.player(seat)?.cards, &hand.buried);
            hand.call_type = Some(options.call_type);
            if options.call_type == CallType::GoingAlone {
                assign_opposition(hand);
                start_play(hand);
            } else {
                hand.phase = Phase::Call;
            }
            Ok(Some(options.call_type))
        }
    }
}

/// Picker names a flagged card; the ace (or ten) of that card's suit becomes
/// the called card and its holder the partner.
pub fn call(hand: &mut HandState, user_id: UserId, card: Card) -> Result<Card, DomainError> {
    hand.require_phase(Phase::Call)?;
    let seat = hand.require_turn(user_id)?;

    let player = hand.player(seat)?;
    if !player.holds(card) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{card} is not in hand"),
        ));
    }
    let options = callable_cards(&player.cards, &hand.buried);
    if !options.legality.is_legal(card) {
        return Err(DomainError::validation(
            ValidationKind::NotCallable,
            format!("{card} cannot be called"),
        ));
    }
    let strategy = CallStrategy::for_call_type(options.call_type).ok_or_else(|| {
        DomainError::invariant(format!("no call strategy for {:?}", options.call_type))
    })?;
    let called = catalog()
        .into_iter()
        .find(|c| c.play_suit() == card.play_suit() && c.power() == strategy.pivot_power)
        .ok_or_else(|| DomainError::invariant(format!("no pivot card for {card}")))?;
    let partner_seat = hand
        .players
        .iter()
        .find(|p| p.holds(called))
        .map(|p| p.seat)
        .ok_or_else(|| DomainError::invariant(format!("called card {called} is not held")))?;

    hand.call_type = Some(options.call_type);
    hand.called_card = Some(called);
    assign_opposition(hand);
    hand.player_mut(partner_seat)?.role = Some(Role::Partner);
    start_play(hand);
    Ok(called)
}

fn assign_opposition(hand: &mut HandState) {
    for p in hand.players.iter_mut().filter(|p| p.role.is_none()) {
        p.role = Some(Role::Opposition);
    }
}

fn start_play(hand: &mut HandState) {
    hand.phase = Phase::Play;
    hand.next_player = 0;
}
