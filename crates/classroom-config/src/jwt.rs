use std::env;

use crate::env_util::parse_or;

pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 3600; // 1 hour
pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 604800; // 7 days

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: parse_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY_SECS),
            refresh_token_expiry: parse_or("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY_SECS),
        }
    }
}
