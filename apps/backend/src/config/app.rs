//! Process configuration from environment variables.

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Live store and realtime fan-out; in-process when absent.
    pub redis_url: Option<String>,
    /// Durable store; in-memory with the built-in catalog when absent.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got {raw:?}"))
            })?,
            None => DEFAULT_PORT,
        };
        let jwt_secret =
            get("BACKEND_JWT_SECRET").ok_or_else(|| AppError::config("BACKEND_JWT_SECRET must be set"))?;

        Ok(Self {
            host: get("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            redis_url: get("REDIS_URL"),
            database_url: get("DATABASE_URL"),
        })
    }
}
