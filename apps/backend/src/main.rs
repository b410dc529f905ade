use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sheepshead::config::AppConfig;
use sheepshead::infra::state::build_state;
use sheepshead::middleware::cors::cors_middleware;
use sheepshead::routes;
use sheepshead::state::security_config::SecurityConfig;
use sheepshead::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment comes from the runtime (docker env_file, or sourced .env locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let security = SecurityConfig::new(config.jwt_secret.as_bytes());
    let app_state = match build_state(security)
        .with_redis(config.redis_url.clone())
        .with_database(config.database_url.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        live_store = app_state.live_store,
        durable_store = app_state.durable_store,
        "Starting sheepshead backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
