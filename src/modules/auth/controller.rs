use axum::{Json, extract::State};
use tracing::instrument;

use classroom_core::AppError;
use classroom_models::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequestDto,
};

use crate::modules::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

/// Register a new account and receive a token pair
#[utoipa::path(
    post,
    path = "/api/auth/register/",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error, weak password or duplicate email/username", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::register(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/auth/token/refresh/",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshTokenResponse),
        (status = 401, description = "Invalid, expired or wrong-kind token", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, AppError> {
    let response =
        AuthService::refresh(&state.db, state.cache.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(response))
}
