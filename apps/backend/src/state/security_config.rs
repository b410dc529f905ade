use std::time::Duration;

use jsonwebtoken::Algorithm;

/// JWT verification settings.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    /// Always HS256 today; kept explicit so verification pins it.
    pub algorithm: Algorithm,
    /// Lifetime of tokens minted by this server.
    pub token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::from_secs(12 * 60 * 60),
        }
    }
}
