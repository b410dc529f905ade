use crate::domain::bidding::{bury, call, pick_or_pass, PickOutcome};
use crate::domain::cards_types::CATALOG_SIZE;
use crate::domain::legality::CallType;
use crate::domain::state::{Phase, Role};
use crate::domain::test_state_helpers::{card, cards, fixture_hand, hand_from, rules, USERS};
use crate::errors::domain::{DomainError, ValidationKind};

fn kind(err: DomainError) -> ValidationKind {
    err.validation_kind().cloned().expect("validation error")
}

#[test]
fn pick_moves_to_bury_without_advancing_turn() {
    let mut hand = fixture_hand();
    let outcome = pick_or_pass(&mut hand, USERS[0], true, true).unwrap();

    assert_eq!(outcome, PickOutcome::Picked);
    assert_eq!(hand.phase, Phase::Bury);
    assert_eq!(hand.next_player, 0);
    assert_eq!(hand.players[0].role, Some(Role::Picker));
    assert_eq!(hand.players[0].cards.len(), 8);
    assert!(hand.blind.is_empty());
    hand.check_conservation(CATALOG_SIZE).unwrap();
}

#[test]
fn pass_advances_turn() {
    let mut hand = fixture_hand();
    assert_eq!(
        pick_or_pass(&mut hand, USERS[0], false, false).unwrap(),
        PickOutcome::Passed
    );
    assert!(hand.players[0].passed);
    assert_eq!(hand.next_player, 1);
    assert_eq!(hand.phase, Phase::Pop);
}

#[test]
fn all_pass_without_nopick_stays_in_pop() {
    let mut hand = fixture_hand();
    let mut last = None;
    for user in USERS {
        last = Some(pick_or_pass(&mut hand, user, false, false).unwrap());
    }
    assert_eq!(last, Some(PickOutcome::AllPassed));
    assert_eq!(hand.phase, Phase::Pop);
    assert!(hand.all_passed());
    assert!(!hand.nopick);
    assert_eq!(hand.blind.len(), 2);
    assert!(hand.is_finished());
}

#[test]
fn passed_out_hand_takes_no_late_pick() {
    let mut hand = fixture_hand();
    for user in USERS {
        pick_or_pass(&mut hand, user, false, false).unwrap();
    }
    let before = hand.clone();
    let last = USERS[USERS.len() - 1];
    let err = pick_or_pass(&mut hand, last, true, false).unwrap_err();
    assert_eq!(kind(err), ValidationKind::PhaseMismatch);
    assert_eq!(hand, before);
}

#[test]
fn all_pass_with_nopick_starts_leaster_play() {
    let mut hand = fixture_hand();
    for (i, user) in USERS.iter().enumerate() {
        let outcome = pick_or_pass(&mut hand, *user, false, true).unwrap();
        if i < 4 {
            assert_eq!(outcome, PickOutcome::Passed);
        } else {
            assert_eq!(outcome, PickOutcome::NoPick);
        }
    }
    assert_eq!(hand.phase, Phase::Play);
    assert!(hand.nopick);
    assert_eq!(hand.next_player, 0);
    assert!(hand.players.iter().all(|p| p.role.is_none()));
}

#[test]
fn pop_rejects_wrong_actor_and_wrong_phase() {
    let mut hand = fixture_hand();
    let before = hand.clone();

    let err = pick_or_pass(&mut hand, USERS[1], true, true).unwrap_err();
    assert_eq!(kind(err), ValidationKind::OutOfTurn);

    let err = pick_or_pass(&mut hand, 999, true, true).unwrap_err();
    assert_eq!(kind(err), ValidationKind::NotSeated);

    let err = bury(&mut hand, USERS[0], &cards(&["QC", "JD"]), rules()).unwrap_err();
    assert_eq!(kind(err), ValidationKind::PhaseMismatch);

    assert_eq!(hand, before);
}

#[test]
fn bury_validates_fully_before_applying() {
    let mut hand = fixture_hand();
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();
    let before = hand.clone();

    let err = bury(&mut hand, USERS[0], &cards(&["QC"]), rules()).unwrap_err();
    assert_eq!(kind(err), ValidationKind::WrongCardCount);

    let err = bury(&mut hand, USERS[0], &cards(&["QC", "QC"]), rules()).unwrap_err();
    assert_eq!(kind(err), ValidationKind::DuplicateCard);

    // first card held, second not: nothing moves
    let err = bury(&mut hand, USERS[0], &cards(&["QC", "QS"]), rules()).unwrap_err();
    assert_eq!(kind(err), ValidationKind::CardNotInHand);

    let err = bury(&mut hand, USERS[1], &cards(&["QS", "JC"]), rules()).unwrap_err();
    assert_eq!(kind(err), ValidationKind::OutOfTurn);

    assert_eq!(hand, before);
}

#[test]
fn bury_then_call_assigns_secret_partner() {
    let mut hand = fixture_hand();
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();

    let call_type = bury(&mut hand, USERS[0], &cards(&["7D", "AC"]), rules()).unwrap();
    assert_eq!(call_type, Some(CallType::CalledAce));
    assert_eq!(hand.phase, Phase::Call);
    assert_eq!(hand.next_player, 0);
    assert_eq!(hand.buried, cards(&["7D", "AC"]));
    hand.check_conservation(CATALOG_SIZE).unwrap();

    // 8C is not flagged: the ace of clubs is buried
    let err = call(&mut hand, USERS[0], card("8C")).unwrap_err();
    assert_eq!(kind(err), ValidationKind::NotCallable);

    let called = call(&mut hand, USERS[0], card("KS")).unwrap();
    assert_eq!(called, card("AS"));
    assert_eq!(hand.called_card, Some(card("AS")));
    assert_eq!(hand.phase, Phase::Play);
    assert_eq!(hand.next_player, 0);
    assert_eq!(hand.players[2].role, Some(Role::Partner));
    for seat in [1, 3, 4] {
        assert_eq!(hand.players[seat].role, Some(Role::Opposition));
    }
}

#[test]
fn unknown_ace_call_picks_the_trump_ace_holder() {
    let mut hand = fixture_hand();
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();
    let call_type = bury(&mut hand, USERS[0], &cards(&["7D", "KS"]), rules()).unwrap();
    assert_eq!(call_type, Some(CallType::UnknownAce));

    let called = call(&mut hand, USERS[0], card("QC")).unwrap();
    assert_eq!(called, card("AD"));
    assert_eq!(hand.players[1].role, Some(Role::Partner));
    assert_eq!(hand.call_type, Some(CallType::UnknownAce));
}

#[test]
fn call_rejects_card_not_in_hand() {
    let mut hand = fixture_hand();
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();
    bury(&mut hand, USERS[0], &cards(&["7D", "AC"]), rules()).unwrap();
    let err = call(&mut hand, USERS[0], card("9S")).unwrap_err();
    assert_eq!(kind(err), ValidationKind::CardNotInHand);
    assert_eq!(hand.phase, Phase::Call);
}

#[test]
fn going_alone_skips_call_phase() {
    let mut hand = hand_from(
        &[
            cards(&["AC", "TC", "AS", "TS", "AH", "TH"]),
            cards(&["7C", "8C", "9C", "KC", "QC", "JC"]),
            cards(&["7S", "8S", "9S", "KS", "QS", "JS"]),
            cards(&["7H", "8H", "9H", "KH", "QH", "JH"]),
            cards(&["7D", "8D", "9D", "KD", "QD", "JD"]),
        ],
        cards(&["AD", "TD"]),
    );
    pick_or_pass(&mut hand, USERS[0], true, true).unwrap();
    let call_type = bury(&mut hand, USERS[0], &cards(&["AD", "TD"]), rules()).unwrap();

    assert_eq!(call_type, Some(CallType::GoingAlone));
    assert_eq!(hand.phase, Phase::Play);
    assert_eq!(hand.next_player, 0);
    assert!(hand.called_card.is_none());
    assert!(hand.players[1..]
        .iter()
        .all(|p| p.role == Some(Role::Opposition)));
    hand.check_conservation(CATALOG_SIZE).unwrap();
}
