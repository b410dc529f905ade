use actix_web::web;

pub mod health;
pub mod houses;
pub mod realtime;

/// Register every route. `main.rs` adds CORS around this; tests call it
/// directly on a bare `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/houses").configure(houses::configure_routes));
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
