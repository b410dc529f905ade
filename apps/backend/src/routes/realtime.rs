use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::warn;

use crate::auth::jwt::authenticate;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::ws::session;

#[derive(Debug, Deserialize)]
struct WsQuery {
    token: Option<String>,
}

/// Browsers cannot set headers on a websocket upgrade, so the JWT rides in
/// the query string. It is verified before the upgrade.
async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let token = query
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::unauthorized_missing_bearer)?;
    let user_id = authenticate(token, &app_state.security).inspect_err(|err| {
        warn!(error = %err, "websocket upgrade rejected");
    })?;
    session::start(&req, stream, user_id, app_state)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(upgrade));
}
