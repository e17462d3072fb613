use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use classroom_auth::{Claims, verify_token};
use classroom_core::{Action, AppError, Denial, UserRole, authorize};
use classroom_models::UserId;

use crate::state::AppState;

/// The caller identified by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0.user_id().map(UserId::from_uuid)
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

/// `Ok(None)` when no `Authorization` header was sent.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    bearer_token(parts)?
        .map(|token| verify_token(token, &state.jwt_config).map(AuthUser))
        .transpose()
}

/// Authenticates the caller and checks the permission `action` requires.
pub fn authorize_request(
    parts: &Parts,
    state: &AppState,
    action: Action,
) -> Result<AuthUser, AppError> {
    let auth_user = authenticate(parts, state)?;

    authorize(auth_user.as_ref().map(AuthUser::role), action).map_err(Denial::into_error)?;

    auth_user.ok_or_else(|| Denial::Unauthenticated.into_error())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)?.ok_or_else(|| Denial::Unauthenticated.into_error())
    }
}

/// Declares an extractor that admits only callers permitted to perform `$action`.
macro_rules! require_action {
    ($name:ident, $action:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                authorize_request(parts, state, $action).map($name)
            }
        }
    };
}

// Profile
require_action!(RequireViewProfile, Action::ViewProfile);
require_action!(RequireUpdateProfile, Action::UpdateProfile);

// Classes
require_action!(RequireListClasses, Action::ListClasses);
require_action!(RequireRetrieveClass, Action::RetrieveClass);
require_action!(RequireCreateClass, Action::CreateClass);
require_action!(RequireUpdateClass, Action::UpdateClass);
require_action!(RequirePartialUpdateClass, Action::PartialUpdateClass);
require_action!(RequireDestroyClass, Action::DestroyClass);
require_action!(RequireEnrollByCode, Action::EnrollByCode);
require_action!(RequireListEnrolledStudents, Action::ListEnrolledStudents);
