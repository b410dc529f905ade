use std::collections::HashSet;

use sheepshead::domain::{HouseConfig, Phase, Role, UserId};
use sheepshead::ErrorCode;
use sheepshead_test_support::{seed_from_env, unique_user_id, unique_user_ids};

use crate::support::app_builder::{seated_house, test_app};
use crate::support::hand_driver::actor;

/// Five users race for four open seats: exactly one is refused and the
/// seat list ends up with five distinct users.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_fill_exactly_the_open_seats() {
    let app = test_app(seed_from_env()).await;
    let host = unique_user_id();
    let house = app
        .state
        .houses
        .create_house(host, HouseConfig::five_handed_called_ace())
        .await
        .unwrap();
    let house_id = house.id;

    let joiners = unique_user_ids(5);
    let tasks: Vec<_> = joiners
        .iter()
        .map(|&user| {
            let houses = app.state.houses.clone();
            tokio::spawn(async move { houses.join_house(house_id, user, None).await })
        })
        .collect();

    let mut full = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => {}
            Err(err) => {
                assert_eq!(err.code(), ErrorCode::HouseFull);
                full += 1;
            }
        }
    }
    assert_eq!(full, 1);

    let house = app.state.houses.get_house(house_id).await.unwrap();
    assert_eq!(house.player_ids.len(), 5);
    let distinct: HashSet<_> = house.player_ids.iter().collect();
    assert_eq!(distinct.len(), 5);
    assert!(house.player_ids.contains(&host));
    // host stays dealer however the seats were inserted
    assert_eq!(house.player_ids[house.dealer_index], host);
}

/// The same user joining twice at once is seated once.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn duplicate_concurrent_join_is_seated_once() {
    let app = test_app(seed_from_env()).await;
    let house = app
        .state
        .houses
        .create_house(unique_user_id(), HouseConfig::five_handed_called_ace())
        .await
        .unwrap();
    let house_id = house.id;
    let user = unique_user_id();

    let a = {
        let houses = app.state.houses.clone();
        tokio::spawn(async move { houses.join_house(house_id, user, Some(1)).await })
    };
    let b = {
        let houses = app.state.houses.clone();
        tokio::spawn(async move { houses.join_house(house_id, user, Some(1)).await })
    };
    let results = [a.await.unwrap(), b.await.unwrap()];
    let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::AlreadySeated);

    let house = app.state.houses.get_house(house_id).await.unwrap();
    assert_eq!(house.player_ids.iter().filter(|&&u| u == user).count(), 1);
}

/// The player on turn sends a pick and a pass at once while the next seat
/// passes. Exactly one of the on-turn actions lands, every loser sees a turn
/// or phase rejection, and each accepted action moves the version by one.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_pick_and_pass_are_applied_one_at_a_time() {
    for round in 0..10u64 {
        let app = test_app(seed_from_env().wrapping_add(round)).await;
        let (house, users) = seated_house(&app, HouseConfig::five_handed_called_ace()).await;
        let hand = app.state.hands.start_hand(house.id, users[0]).await.unwrap();
        let hand_id = hand.id;
        let first = actor(&hand);
        let second = hand.players[hand.next_seat(hand.next_player) as usize].user_id;

        let spawn = |user: UserId, pick: bool| {
            let hands = app.state.hands.clone();
            tokio::spawn(async move { hands.pick_or_pass(hand_id, user, pick).await })
        };
        let pick = spawn(first, true);
        let pass = spawn(first, false);
        let next_pass = spawn(second, false);
        let pick = pick.await.unwrap();
        let pass = pass.await.unwrap();
        let next_pass = next_pass.await.unwrap();

        assert!(
            pick.is_ok() != pass.is_ok(),
            "exactly one of the on-turn pick and pass lands"
        );
        let mut accepted = 0;
        for result in [&pick, &pass, &next_pass] {
            match result {
                Ok(_) => accepted += 1,
                Err(err) => assert!(
                    matches!(err.code(), ErrorCode::OutOfTurn | ErrorCode::PhaseMismatch),
                    "unexpected rejection {:?}",
                    err.code()
                ),
            }
        }

        let stored = app.state.hands.get_hand(hand_id).await.unwrap();
        assert_eq!(stored.version, hand.version + accepted);
        if pick.is_ok() {
            assert_eq!(stored.phase, Phase::Bury);
            assert_eq!(stored.players[hand.next_player as usize].role, Some(Role::Picker));
            assert_eq!(next_pass.unwrap_err().code(), ErrorCode::PhaseMismatch);
        } else {
            assert_eq!(stored.phase, Phase::Pop);
            assert!(stored.players[hand.next_player as usize].passed);
            assert!(stored.players.iter().all(|p| p.role.is_none()));
        }
    }
}
