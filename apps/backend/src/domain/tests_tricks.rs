use crate::domain::bidding::{bury, call, pick_or_pass};
use crate::domain::cards_types::{CATALOG_POINTS, CATALOG_SIZE};
use crate::domain::legality::playable_for_seat;
use crate::domain::scoring::{points_by_seat, PICKER_WIN_POINTS};
use crate::domain::state::{HandState, Phase, Play};
use crate::domain::test_state_helpers::{card, cards, fixture_hand, rules, USERS};
use crate::domain::tricks::{play_card, resolve_trick};
use crate::errors::domain::ValidationKind;

fn play(seat: u8, code: &str) -> Play {
    Play {
        seat,
        user_id: USERS[seat as usize],
        card: card(code),
    }
}

/// Fixture deal, seat 0 picks, buries 7D+AC, calls AS (partner = seat 2).
fn called_ace_hand() -> HandState {
    let mut hand = fixture_hand();
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();
    bury(&mut hand, USERS[0], &cards(&["7D", "AC"]), rules()).unwrap();
    call(&mut hand, USERS[0], card("KS")).unwrap();
    hand
}

/// Play the lowest legal card for whoever is on turn until the hand ends.
fn play_out(hand: &mut HandState) {
    while hand.phase == Phase::Play {
        let seat = hand.next_player;
        let legal = playable_for_seat(hand, seat).legal_cards();
        let choice = *legal.first().expect("someone on turn always has a legal card");
        play_card(hand, USERS[seat as usize], choice, rules()).unwrap();
        hand.check_conservation(CATALOG_SIZE).unwrap();
    }
}

#[test]
fn highest_trump_takes_the_trick() {
    let plays = vec![play(0, "AH"), play(1, "7D"), play(2, "TH"), play(3, "QS"), play(4, "KH")];
    assert_eq!(resolve_trick(&plays), Some(3));
}

#[test]
fn highest_of_led_suit_takes_without_trump() {
    let plays = vec![play(0, "9S"), play(1, "AH"), play(2, "TS"), play(3, "7S"), play(4, "KC")];
    assert_eq!(resolve_trick(&plays), Some(2));
}

#[test]
fn trump_lead_is_won_by_power_not_natural_suit() {
    let plays = vec![play(0, "AD"), play(1, "JD"), play(2, "QD"), play(3, "JC"), play(4, "9D")];
    assert_eq!(resolve_trick(&plays), Some(2));
}

#[test]
fn play_rejects_out_of_turn_missing_and_illegal_cards() {
    let mut hand = called_ace_hand();

    let err = play_card(&mut hand, USERS[1], card("QS"), rules()).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::OutOfTurn));

    let err = play_card(&mut hand, USERS[0], card("QS"), rules()).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::CardNotInHand));

    // Seat 0 leads KS; seat 1 holds 9S and must follow spades.
    play_card(&mut hand, USERS[0], card("KS"), rules()).unwrap();
    let before = hand.clone();
    let err = play_card(&mut hand, USERS[1], card("QS"), rules()).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::IllegalCard));
    assert_eq!(hand, before);
}

#[test]
fn called_suit_lead_forces_partner_and_reveals_role() {
    let mut hand = called_ace_hand();
    play_card(&mut hand, USERS[0], card("KS"), rules()).unwrap();
    play_card(&mut hand, USERS[1], card("9S"), rules()).unwrap();
    // Seat 2 is the partner and must drop the called ace.
    assert_eq!(playable_for_seat(&hand, 2).legal_cards(), cards(&["AS"]));
    assert!(!hand.called_card_played());
    play_card(&mut hand, USERS[2], card("AS"), rules()).unwrap();
    assert!(hand.called_card_played());
}

#[test]
fn trick_taker_leads_next() {
    let mut hand = called_ace_hand();
    for (seat, code) in [(0, "KS"), (1, "9S"), (2, "AS"), (3, "TS"), (4, "7S")] {
        let result = play_card(&mut hand, USERS[seat], card(code), rules()).unwrap();
        assert_eq!(result.trick_completed, seat == 4);
    }
    assert_eq!(hand.tricks.len(), 1);
    assert_eq!(hand.tricks[0].taker, 2);
    assert_eq!(hand.tricks[0].points, 4 + 11 + 10);
    assert_eq!(hand.next_player, 2);
    assert!(hand.current_trick.is_empty());
}

#[test]
fn picker_hand_plays_to_completion() {
    let mut hand = called_ace_hand();
    play_out(&mut hand);

    assert_eq!(hand.phase, Phase::Complete);
    assert_eq!(hand.tricks.len(), 6);
    assert!(hand.players.iter().all(|p| p.cards.is_empty()));
    let outcome = hand.outcome.expect("outcome set on completion");
    assert_eq!(outcome.picker_points + outcome.opposition_points, CATALOG_POINTS);
    assert_eq!(outcome.opposition_win, outcome.picker_points < PICKER_WIN_POINTS);
    assert!(outcome.leaster_winner.is_none());
    let expected_winner = if outcome.opposition_win {
        outcome.opposition_points
    } else {
        outcome.picker_points
    };
    assert_eq!(outcome.winning_score, expected_winner);
}

#[test]
fn leaster_plays_to_completion() {
    let mut hand = fixture_hand();
    for user in USERS {
        pick_or_pass(&mut hand, user, false, true).unwrap();
    }
    play_out(&mut hand);

    let outcome = hand.outcome.expect("outcome set on completion");
    let winner = outcome.leaster_winner.expect("leaster has a winner") as usize;
    assert!(hand.tricks.iter().any(|t| t.taker as usize == winner));
    assert_eq!(outcome.picker_points + outcome.opposition_points, CATALOG_POINTS);

    // the blind went to the last trick's taker
    let mut points = points_by_seat(&hand);
    let last_taker = hand.tricks.last().unwrap().taker as usize;
    points[last_taker] += 11; // 7D + AC
    assert_eq!(outcome.winning_score, points[winner]);
    for (seat, p) in points.iter().enumerate() {
        if hand.tricks.iter().any(|t| t.taker as usize == seat) {
            assert!(*p >= outcome.winning_score);
        }
    }
}

#[test]
fn play_rejected_after_completion() {
    let mut hand = called_ace_hand();
    play_out(&mut hand);
    let err = play_card(&mut hand, USERS[0], card("QC"), rules()).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}
