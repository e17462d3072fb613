use std::env;

use crate::env_util::split_list;
use crate::server::Environment;

/// Origins allowed to call the API from a browser.
///
/// Development allows any origin; production only the origins listed in
/// `ALLOWED_ORIGINS`.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allow_all_origins: bool,
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env(environment: Environment) -> Self {
        let allowed_origins = split_list(
            &env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
        );

        Self {
            allow_all_origins: environment.is_development(),
            allowed_origins,
        }
    }
}
