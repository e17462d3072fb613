use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use classroom_core::AppError;
use classroom_models::{UpdateProfileDto, User};

use crate::middleware::auth::{RequireUpdateProfile, RequireViewProfile};
use crate::modules::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile/",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    RequireViewProfile(auth_user): RequireViewProfile,
) -> Result<Json<User>, AppError> {
    let user = UserService::find_by_id(&state.db, state.cache.as_ref(), auth_user.user_id()?)
        .await
        .map_err(|e| match e.status {
            StatusCode::NOT_FOUND => AppError::unauthorized("User not found"),
            _ => e,
        })?;
    Ok(Json(user))
}

/// Update the current user's profile
///
/// PUT and PATCH both apply only the fields sent. The role cannot change.
#[utoipa::path(
    patch,
    path = "/api/auth/profile/",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Validation error or duplicate email/username", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUpdateProfile(auth_user): RequireUpdateProfile,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(
        &state.db,
        state.cache.as_ref(),
        auth_user.user_id()?,
        dto,
    )
    .await?;
    Ok(Json(user))
}
