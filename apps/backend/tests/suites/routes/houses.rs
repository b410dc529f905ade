use std::time::SystemTime;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use sheepshead::{mint_access_token, routes};
use sheepshead_test_support::{seed_from_env, unique_user_id};

use crate::support::app_builder::test_app;

fn bearer(user_id: i64, app: &crate::support::app_builder::TestApp) -> String {
    let token = mint_access_token(user_id, SystemTime::now(), &app.state.security).unwrap();
    format!("Bearer {token}")
}

#[actix_web::test]
async fn create_then_fetch_a_house() {
    let app = test_app(seed_from_env()).await;
    let host = unique_user_id();
    let auth = bearer(host, &app);
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/houses")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["host_id"], host);
    assert_eq!(created["player_ids"], json!([host]));
    assert_eq!(created["config"]["variant"], "G_5H_CA");

    let id = created["house_id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/houses/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn create_accepts_an_explicit_config() {
    let app = test_app(seed_from_env()).await;
    let auth = bearer(unique_user_id(), &app);
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let config = json!({
        "variant": "G_5H_CA",
        "player_count": 5,
        "nopick_legal": false,
        "automatic_double": true,
        "blitz_legal": false,
        "crack_legal": false,
        "chat_enabled": false,
        "players_permitted": "FRIENDS",
        "spectators_permitted": "NOBODY"
    });
    let req = test::TestRequest::post()
        .uri("/api/houses")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(&config)
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["config"], config);
}
