use axum::{Json, extract::State, http::StatusCode};
use tracing::{instrument, warn};

use classroom_db::check_connection;
use classroom_models::HealthResponse;

use crate::state::AppState;

/// Check database and cache connectivity
#[utoipa::path(
    get,
    path = "/health/",
    responses(
        (status = 200, description = "Database and cache reachable", body = HealthResponse),
        (status = 503, description = "A dependency is unreachable", body = HealthResponse),
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_connection(&state.db).await;
    let cache = match state.cache.as_ref() {
        Some(cache) => cache.health_probe().await,
        None => false,
    };

    let response = HealthResponse::new(database, cache, env!("CARGO_PKG_VERSION"));
    if response.is_healthy() {
        (StatusCode::OK, Json(response))
    } else {
        warn!(database, cache, "Health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
