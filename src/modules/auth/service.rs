use sqlx::PgPool;
use tracing::{info, instrument, warn};

use classroom_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use classroom_cache::RedisCache;
use classroom_config::JwtConfig;
use classroom_core::{AppError, hash_password, validate_password_strength, verify_password};
use classroom_models::{
    AuthResponse, LoginRequest, RegisterRequestDto, RefreshTokenRequest, RefreshTokenResponse,
    TokenPair, User, UserId,
};

use crate::metrics;
use crate::modules::users::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

/// Checks every rule that can be decided without storage.
pub fn check_registration(dto: &RegisterRequestDto) -> Result<(), AppError> {
    validate_password_strength(&dto.password, &dto.password_context())
        .map_err(|problems| AppError::validation("password", problems))?;

    if dto.password != dto.confirm_password {
        return Err(AppError::validation(
            "confirm_password",
            vec!["Password and confirm password did not match".to_string()],
        ));
    }

    Ok(())
}

fn issue_tokens(user: &User, jwt_config: &JwtConfig) -> Result<TokenPair, AppError> {
    let user_id = user.id.into_inner();
    let access = create_access_token(user_id, &user.email, user.role, jwt_config)?;
    let refresh = create_refresh_token(user_id, &user.email, jwt_config)?;

    metrics::track_tokens_issued("access");
    metrics::track_tokens_issued("refresh");

    Ok(TokenPair { refresh, access })
}

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(user.role = %dto.role))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequestDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        check_registration(&dto)?;

        let password_hash = hash_password(&dto.password)?;
        let user = UserService::create(db, &dto, &password_hash).await?;
        let tokens = issue_tokens(&user, jwt_config)?;

        metrics::track_user_registered(user.role);
        info!(user.id = %user.id, user.role = %user.role, "User registered");

        Ok(AuthResponse { user, tokens })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let Some(credentials) = UserService::find_credentials_by_email(db, &dto.email).await?
        else {
            warn!("Login attempt for unknown email");
            metrics::track_login_failure();
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            warn!(user.id = %credentials.user.id, "Login attempt with wrong password");
            metrics::track_login_failure();
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = credentials.user;
        let tokens = issue_tokens(&user, jwt_config)?;

        metrics::track_login_success(user.role);
        info!(user.id = %user.id, "User logged in");

        Ok(AuthResponse { user, tokens })
    }

    /// Issues a new access token. The role is re-read from storage.
    #[instrument(skip(db, cache, dto, jwt_config))]
    pub async fn refresh(
        db: &PgPool,
        cache: Option<&RedisCache>,
        dto: RefreshTokenRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshTokenResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;
        let user_id = UserId::from_uuid(claims.user_id()?);

        let user = UserService::find_by_id(db, cache, user_id)
            .await
            .map_err(|e| {
                if e.status.is_client_error() {
                    AppError::unauthorized("User not found")
                } else {
                    e
                }
            })?;

        let access = create_access_token(user.id.into_inner(), &user.email, user.role, jwt_config)?;
        metrics::track_tokens_issued("access");

        Ok(RefreshTokenResponse { access })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classroom_core::UserRole;

    fn dto(password: &str, confirm: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: "grace@example.com".to_string(),
            username: "ghopper".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            role: UserRole::Teacher,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(check_registration(&dto("Punch-Card-1952!", "Punch-Card-1952!")).is_ok());
    }

    #[test]
    fn test_email_domain_does_not_block_password() {
        assert!(check_registration(&dto("Welcome-Home-77!", "Welcome-Home-77!")).is_ok());
    }

    #[test]
    fn test_mismatched_confirmation_rejected() {
        let err = check_registration(&dto("Punch-Card-1952!", "Punch-Card-1952?")).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert!(err.details.unwrap().contains_key("confirm_password"));
    }

    #[test]
    fn test_weak_password_reported_under_password() {
        let err = check_registration(&dto("12345678", "12345678")).unwrap_err();
        let details = err.details.unwrap();
        let problems = details["password"].as_array().unwrap();
        assert!(problems.len() >= 2);
    }

    #[test]
    fn test_password_similar_to_name_rejected() {
        let err = check_registration(&dto("hopper-2024", "hopper-2024")).unwrap_err();
        assert!(err.public_message().contains("too similar"));
    }
}
