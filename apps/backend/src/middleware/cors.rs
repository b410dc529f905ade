use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser client.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma separated, http/https
/// only); localhost:3000 when none are configured.
pub fn cors_middleware() -> Cors {
    let configured = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let origins = parse_origins(&configured);

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);
    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }
    cors
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}
