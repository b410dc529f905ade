use sheepshead::domain::{HouseConfig, Phase, CATALOG_SIZE};
use sheepshead::ErrorCode;
use sheepshead_test_support::seed_from_env;

use crate::support::app_builder::{seated_house, test_app};
use crate::support::hand_driver::{actor, pick_and_play_out, step};

#[tokio::test]
async fn dealt_hand_starts_left_of_dealer() {
    let app = test_app(seed_from_env()).await;
    let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;

    let hand = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
    assert_eq!(hand.phase, Phase::Pop);
    assert_eq!(hand.next_player, 0);
    assert_eq!(hand.multiplier, 1);
    // dealer is users[0]; turn order starts with the next seat and wraps
    let order: Vec<_> = hand.players.iter().map(|p| p.user_id).collect();
    assert_eq!(order, vec![users[1], users[2], users[3], users[4], users[0]]);
    assert!(hand.players.iter().all(|p| p.cards.len() == 6));
    assert_eq!(hand.blind.len(), 2);
    hand.check_conservation(CATALOG_SIZE).unwrap();

    let house = app.state.houses.get_house(house.id).await.unwrap();
    assert_eq!(house.active_hand, Some(hand.id));
}

#[tokio::test]
async fn picked_hand_plays_to_completion() {
    let app = test_app(seed_from_env()).await;
    let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;
    let hand = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
    let picker = actor(&hand);

    let done = pick_and_play_out(&app.state.hands, hand).await;
    assert_eq!(done.phase, Phase::Complete);
    assert_eq!(done.tricks.len(), 6);
    assert_eq!(done.buried.len(), 2);
    assert!(done.players.iter().all(|p| p.cards.is_empty()));
    assert_eq!(done.players[done.picker().unwrap() as usize].user_id, picker);

    let outcome = done.outcome.expect("completed hand is scored");
    assert_eq!(outcome.picker_points + outcome.opposition_points, 120);
    assert_eq!(outcome.opposition_win, outcome.picker_points < 61);
    let expected_score = if outcome.opposition_win {
        outcome.opposition_points
    } else {
        outcome.picker_points
    };
    assert_eq!(outcome.winning_score, expected_score);
    assert!(outcome.leaster_winner.is_none());

    // finished hands leave the live store and free the house
    let err = app.state.hands.get_hand(done.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::HandNotFound);
    let house = app.state.houses.get_house(house.id).await.unwrap();
    assert_eq!(house.active_hand, None);
    assert_eq!(house.dealer_index, 1);
}

#[tokio::test]
async fn trick_taker_leads_the_next_trick() {
    let app = test_app(seed_from_env()).await;
    let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;
    let hand = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
    let mut hand = app
        .state
        .hands
        .pick_or_pass(hand.id, actor(&hand), true)
        .await
        .unwrap();

    while hand.phase != Phase::Complete {
        let tricks_before = hand.tricks.len();
        hand = step(&app.state.hands, &hand).await.unwrap();
        if hand.tricks.len() > tricks_before {
            let taken = hand.tricks.last().unwrap();
            assert_eq!(taken.plays.len(), 5);
            assert_eq!(hand.next_player, taken.taker);
            assert!(hand.current_trick.is_empty());
        }
    }
}

#[tokio::test]
async fn next_hand_moves_the_deal_along() {
    let app = test_app(seed_from_env()).await;
    let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;
    let first = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
    pick_and_play_out(&app.state.hands, first.clone()).await;

    let second = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.players[0].user_id, users[2]);
}

#[tokio::test]
async fn all_pass_with_nopick_plays_a_leaster() {
    let app = test_app(seed_from_env()).await;
    let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;
    let mut hand = app.state.hands.start_hand(house.id, users[0]).await.unwrap();

    for _ in 0..5 {
        assert_eq!(hand.phase, Phase::Pop);
        hand = app
            .state
            .hands
            .pick_or_pass(hand.id, actor(&hand), false)
            .await
            .unwrap();
    }
    assert_eq!(hand.phase, Phase::Play);
    assert!(hand.nopick);
    assert_eq!(hand.next_player, 0);
    assert_eq!(hand.blind.len(), 2);

    while hand.phase != Phase::Complete {
        hand = step(&app.state.hands, &hand).await.unwrap();
    }
    let outcome = hand.outcome.unwrap();
    let winner = outcome.leaster_winner.expect("leaster has a winner");
    assert!(hand.tricks.iter().any(|t| t.taker == winner));
    assert!(!outcome.opposition_win);
}
