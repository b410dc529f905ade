use sheepshead::domain::legality::{callable_cards, playable_for_seat};
use sheepshead::domain::{HandState, HouseConfig, Phase};
use sheepshead::ErrorCode;
use sheepshead_test_support::{seed_from_env, unique_user_id};

use crate::support::app_builder::{seated_house, test_app, TestApp};
use crate::support::hand_driver::{actor, step};

async fn started(app: &TestApp) -> HandState {
    let (house, users) = seated_house(app, HouseConfig::five_handed_called_ace()).await;
    app.state.hands.start_hand(house.id, users[0]).await.unwrap()
}

#[tokio::test]
async fn out_of_turn_is_rejected_without_a_write() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let waiting = hand.players[2].user_id;

    let err = app
        .state
        .hands
        .pick_or_pass(hand.id, waiting, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OutOfTurn);
    assert_eq!(app.state.hands.get_hand(hand.id).await.unwrap(), hand);
}

#[tokio::test]
async fn strangers_are_not_seated() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let err = app
        .state
        .hands
        .pick_or_pass(hand.id, unique_user_id(), false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotSeated);
}

#[tokio::test]
async fn actions_in_the_wrong_phase_are_rejected() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let user = actor(&hand);
    let cards = hand.players[0].cards.clone();

    let err = app.state.hands.bury(hand.id, user, &cards[..2]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);
    let err = app.state.hands.play(hand.id, user, cards[0]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);
    let err = app.state.hands.call(hand.id, user, cards[0]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);
}

#[tokio::test]
async fn bury_checks_count_duplicates_and_ownership() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let picker = actor(&hand);
    let hand = app
        .state
        .hands
        .pick_or_pass(hand.id, picker, true)
        .await
        .unwrap();
    assert_eq!(hand.phase, Phase::Bury);
    let mine = hand.players[0].cards.clone();
    assert_eq!(mine.len(), 8);
    let theirs = hand.players[1].cards[0];

    let err = app.state.hands.bury(hand.id, picker, &mine[..1]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongCardCount);
    let err = app
        .state
        .hands
        .bury(hand.id, picker, &[mine[0], mine[0]])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateCard);
    let err = app
        .state
        .hands
        .bury(hand.id, picker, &[mine[0], theirs])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotInHand);

    assert_eq!(app.state.hands.get_hand(hand.id).await.unwrap(), hand);
}

#[tokio::test]
async fn call_must_be_a_flagged_card() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let picker = actor(&hand);
    let hand = app
        .state
        .hands
        .pick_or_pass(hand.id, picker, true)
        .await
        .unwrap();
    let hand = step(&app.state.hands, &hand).await.unwrap();
    if hand.phase != Phase::Call {
        // the seeded deal left the picker going alone
        assert!(hand.partner().is_none());
        return;
    }

    let cards = &hand.players[0].cards;
    let options = callable_cards(cards, &hand.buried);
    if let Some(&bad) = cards.iter().find(|c| !options.legality.is_legal(**c)) {
        let err = app.state.hands.call(hand.id, picker, bad).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotCallable);
    }
    let elsewhere = hand.players[3].cards[0];
    let err = app.state.hands.call(hand.id, picker, elsewhere).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotInHand);
}

#[tokio::test]
async fn off_suit_play_is_illegal_while_following_is_possible() {
    let app = test_app(seed_from_env()).await;
    let hand = started(&app).await;
    let mut hand = app
        .state
        .hands
        .pick_or_pass(hand.id, actor(&hand), true)
        .await
        .unwrap();

    let mut rejected = 0;
    while hand.phase != Phase::Complete {
        if hand.phase == Phase::Play {
            let seat = hand.next_player;
            let legality = playable_for_seat(&hand, seat);
            let illegal = hand.players[seat as usize]
                .cards
                .iter()
                .copied()
                .find(|c| !legality.is_legal(*c));
            if let Some(card) = illegal {
                let err = app
                    .state
                    .hands
                    .play(hand.id, actor(&hand), card)
                    .await
                    .unwrap_err();
                assert_eq!(err.code(), ErrorCode::IllegalCard);
                assert_eq!(app.state.hands.get_hand(hand.id).await.unwrap(), hand);
                rejected += 1;
            }
        }
        hand = step(&app.state.hands, &hand).await.unwrap();
    }
    assert!(rejected > 0, "no follow-suit restriction came up in 30 plays");
}

#[tokio::test]
async fn unknown_hand_is_not_found() {
    let app = test_app(seed_from_env()).await;
    let err = app
        .state
        .hands
        .pick_or_pass(987_654, unique_user_id(), true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::HandNotFound);
}
