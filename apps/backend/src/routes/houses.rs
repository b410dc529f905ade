use actix_web::{web, HttpResponse};

use crate::domain::snapshot::house_public;
use crate::domain::{HouseConfig, HouseId};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::state::app_state::AppState;

/// An empty body creates a default five-handed called-ace house.
fn parse_config(body: &[u8]) -> Result<HouseConfig, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HouseConfig::five_handed_called_ace());
    }
    serde_json::from_slice(body).map_err(|err| {
        AppError::invalid(
            ErrorCode::MalformedPayload,
            format!("Invalid house config: {err}"),
        )
    })
}

async fn create_house(
    current_user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let config = parse_config(&body)?;
    let house = app_state.houses.create_house(current_user.id, config).await?;
    Ok(HttpResponse::Created().json(house_public(&house)))
}

async fn get_house(
    path: web::Path<HouseId>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let house = app_state.houses.get_house(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(house_public(&house)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_house))
        .route("/{house_id}", web::get().to(get_house));
}
