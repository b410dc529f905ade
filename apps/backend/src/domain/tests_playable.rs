use crate::domain::legality::{decision_legality, playable_cards, playable_for_seat};
use crate::domain::state::{Phase, Play, Role};
use crate::domain::test_state_helpers::{card, cards, fixture_hand, USERS};

#[test]
fn must_follow_led_fail_suit() {
    let hand = cards(&["7H", "KH", "QC", "8C"]);
    let legal = playable_cards(&hand, Some(card("AH")), Some(Role::Opposition), None, false);
    assert_eq!(legal.legal_cards(), cards(&["7H", "KH"]));
    assert!(!legal.is_legal(card("QC")));
}

#[test]
fn trump_lead_requires_trump_including_queens_and_diamonds() {
    let hand = cards(&["7D", "JS", "AH", "8C"]);
    let legal = playable_cards(&hand, Some(card("QC")), None, None, false);
    assert!(legal.is_legal(card("7D")));
    assert!(legal.is_legal(card("JS")));
    assert!(!legal.is_legal(card("AH")));
}

#[test]
fn void_player_may_play_anything() {
    let hand = cards(&["7D", "JS", "8C"]);
    let legal = playable_cards(&hand, Some(card("TH")), Some(Role::Opposition), None, false);
    assert_eq!(legal.legal_cards().len(), 3);
}

#[test]
fn partner_must_play_called_card_when_its_suit_is_led() {
    let hand = cards(&["AS", "9S", "QH"]);
    let legal = playable_cards(
        &hand,
        Some(card("KS")),
        Some(Role::Partner),
        Some(card("AS")),
        false,
    );
    assert_eq!(legal.legal_cards(), cards(&["AS"]));
}

#[test]
fn picker_must_play_called_suit_when_it_is_led() {
    let hand = cards(&["KS", "QC", "JD"]);
    let legal = playable_cards(
        &hand,
        Some(card("TS")),
        Some(Role::Picker),
        Some(card("AS")),
        false,
    );
    assert_eq!(legal.legal_cards(), cards(&["KS"]));
}

#[test]
fn normal_rule_returns_once_called_card_is_out() {
    let hand = cards(&["9S", "QH"]);
    // called card already played: partner just follows suit
    let legal = playable_cards(
        &hand,
        Some(card("KS")),
        Some(Role::Partner),
        Some(card("AS")),
        true,
    );
    assert_eq!(legal.legal_cards(), cards(&["9S"]));
}

#[test]
fn other_suit_led_uses_normal_rule_for_partner() {
    let hand = cards(&["AS", "9S", "7H"]);
    let legal = playable_cards(
        &hand,
        Some(card("KH")),
        Some(Role::Partner),
        Some(card("AS")),
        false,
    );
    assert_eq!(legal.legal_cards(), cards(&["7H"]));
}

#[test]
fn legality_for_seat_reads_current_trick_and_called_card() {
    let mut hand = fixture_hand();
    hand.phase = Phase::Play;
    hand.players[0].role = Some(Role::Picker);
    hand.players[2].role = Some(Role::Partner);
    hand.called_card = Some(card("AS"));
    hand.current_trick.push(Play {
        seat: 1,
        user_id: USERS[1],
        card: card("9S"),
    });
    hand.players[1].cards.retain(|c| *c != card("9S"));
    hand.next_player = 2;

    // Seat 2 holds AS and 8H among others: only AS is playable.
    assert_eq!(playable_for_seat(&hand, 2).legal_cards(), cards(&["AS"]));
    assert_eq!(decision_legality(&hand, 2).legal_cards(), cards(&["AS"]));
    // Seats not on turn get nothing.
    assert!(!decision_legality(&hand, 3).any());
}

#[test]
fn decision_legality_by_phase() {
    let mut hand = fixture_hand();
    assert!(!decision_legality(&hand, 0).any(), "POP is not a card decision");
    hand.phase = Phase::Bury;
    assert_eq!(decision_legality(&hand, 0).legal_cards().len(), 6);
}
