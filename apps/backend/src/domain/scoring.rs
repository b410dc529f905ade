//! Hand outcome once every trick has been taken.

use crate::domain::cards_logic::card_points;
use crate::domain::state::{HandOutcome, HandState, Role, Seat};
use crate::errors::domain::DomainError;

/// Points the picker side needs to win.
pub const PICKER_WIN_POINTS: u16 = 61;

/// Points taken per seat, including any cards credited outside of tricks.
pub fn points_by_seat(hand: &HandState) -> Vec<u16> {
    let mut points = vec![0u16; hand.seat_count()];
    for trick in &hand.tricks {
        if let Some(p) = points.get_mut(trick.taker as usize) {
            *p += trick.points;
        }
    }
    points
}

pub fn score_hand(hand: &HandState) -> Result<HandOutcome, DomainError> {
    if hand.nopick {
        score_leaster(hand)
    } else {
        score_picker_hand(hand)
    }
}

fn score_picker_hand(hand: &HandState) -> Result<HandOutcome, DomainError> {
    let points = points_by_seat(hand);
    hand.picker()
        .ok_or_else(|| DomainError::invariant("picker hand without a picker"))?;
    let mut picker_points = card_points(&hand.buried);
    let mut opposition_points = 0u16;
    for player in &hand.players {
        let taken = points[player.seat as usize];
        match player.role {
            Some(Role::Picker) | Some(Role::Partner) => picker_points += taken,
            _ => opposition_points += taken,
        }
    }
    let opposition_win = picker_points < PICKER_WIN_POINTS;
    Ok(HandOutcome {
        picker_points,
        opposition_points,
        opposition_win,
        winning_score: if opposition_win {
            opposition_points
        } else {
            picker_points
        },
        leaster_winner: None,
    })
}

// The blind goes to whoever took the last trick; the fewest points among
// seats that took a trick wins, earliest seat on ties.
fn score_leaster(hand: &HandState) -> Result<HandOutcome, DomainError> {
    let mut points = points_by_seat(hand);
    let last = hand
        .tricks
        .last()
        .ok_or_else(|| DomainError::invariant("leaster scored before any trick"))?;
    if let Some(p) = points.get_mut(last.taker as usize) {
        *p += card_points(&hand.blind);
    }
    let winner = (0..hand.seat_count())
        .filter(|&seat| hand.tricks.iter().any(|t| t.taker as usize == seat))
        .min_by_key(|&seat| (points[seat], seat))
        .ok_or_else(|| DomainError::invariant("leaster without trick takers"))?;
    let winning_score = points[winner];
    let total: u16 = points.iter().sum();
    Ok(HandOutcome {
        picker_points: winning_score,
        opposition_points: total - winning_score,
        opposition_win: false,
        winning_score,
        leaster_winner: Some(winner as Seat),
    })
}
