use std::sync::Arc;

use axum::{Router, routing::post};
use tower_governor::GovernorLayer;

use classroom_config::RateLimitConfig;

use crate::state::AppState;

use super::controller::{login_user, refresh_token, register_user};

/// Public authentication routes, rate limited per client IP when enabled.
pub fn init_auth_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/register/", post(register_user))
        .route("/login/", post(login_user))
        .route("/token/refresh/", post(refresh_token));

    match rate_limit.auth_governor_config() {
        Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
        None => router,
    }
}
