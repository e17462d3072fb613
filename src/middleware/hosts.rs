use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use classroom_core::AppError;
use tracing::warn;

use crate::state::AppState;

/// Rejects requests whose `Host` header is not in `ALLOWED_HOSTS`.
/// A no-op outside production.
pub async fn allowed_hosts_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.server_config.enforces_allowed_hosts() {
        return next.run(req).await;
    }

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
        .to_string();

    if state.server_config.is_host_allowed(&host) {
        next.run(req).await
    } else {
        warn!(host = %host, "Rejected request with disallowed Host header");
        AppError::bad_request("Invalid host header").into_response()
    }
}
