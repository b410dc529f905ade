use std::time::SystemTime;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use sheepshead::{mint_access_token, routes};
use sheepshead_test_support::problem_details::assert_problem_details_structure;
use sheepshead_test_support::{seed_from_env, unique_user_id};

use crate::support::app_builder::test_app;

#[actix_web::test]
async fn unknown_house_is_a_404_problem() {
    let app = test_app(seed_from_env()).await;
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/houses/424242").to_request();
    let resp = test::call_service(&svc, req).await;
    let problem =
        assert_problem_details_structure(resp, "HOUSE_NOT_FOUND", StatusCode::NOT_FOUND, None)
            .await;
    assert_eq!(problem.title, "House Not Found");
}

#[actix_web::test]
async fn missing_bearer_is_a_401_problem() {
    let app = test_app(seed_from_env()).await;
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/houses").to_request();
    let resp = test::call_service(&svc, req).await;
    assert_problem_details_structure(
        resp,
        "UNAUTHORIZED_MISSING_BEARER",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
}

#[actix_web::test]
async fn invalid_config_is_a_400_problem() {
    let app = test_app(seed_from_env()).await;
    let token = mint_access_token(unique_user_id(), SystemTime::now(), &app.state.security).unwrap();
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let mut config = serde_json::to_value(sheepshead::domain::HouseConfig::five_handed_called_ace())
        .unwrap();
    config["player_count"] = 4.into();
    let req = test::TestRequest::post()
        .uri("/api/houses")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(&config)
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_problem_details_structure(resp, "INVALID_CONFIG", StatusCode::BAD_REQUEST, Some("4"))
        .await;
}

#[actix_web::test]
async fn malformed_body_is_a_400_problem() {
    let app = test_app(seed_from_env()).await;
    let token = mint_access_token(unique_user_id(), SystemTime::now(), &app.state.security).unwrap();
    let svc = test::init_service(
        App::new()
            .app_data(web::Data::new(app.state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/houses")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"variant\":")
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_problem_details_structure(resp, "MALFORMED_PAYLOAD", StatusCode::BAD_REQUEST, None)
        .await;
}
