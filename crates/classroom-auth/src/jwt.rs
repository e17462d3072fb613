//! Token creation and verification.
//!
//! All tokens are HS256-signed with the configured secret. Verification
//! checks signature, expiry and the `token_type` claim.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use classroom_config::JwtConfig;
use classroom_core::{AppError, UserRole};

use crate::claims::{Claims, RefreshTokenClaims, TokenType};

fn timestamps(lifetime_secs: i64) -> (usize, usize) {
    let now = Utc::now().timestamp();
    let exp = (now + lifetime_secs).max(0);
    (now as usize, exp as usize)
}

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = timestamps(jwt_config.access_token_expiry);

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        token_type: TokenType::Access,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token. Refresh tokens are rejected.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Access {
        return Err(AppError::unauthorized("Invalid or expired token"));
    }

    Ok(claims)
}

pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = timestamps(jwt_config.refresh_token_expiry);

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: TokenType::Refresh,
        jti: Uuid::new_v4().to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create refresh token: {}", e)))
}

/// Verifies a refresh token. Access tokens are rejected.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    let claims = decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Invalid or expired refresh token"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_round_trip_keeps_role() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token =
            create_access_token(user_id, "ada@example.com", UserRole::Student, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, UserRole::Student);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        assert!(verify_token("invalid-token", &config).is_err());
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "ada@example.com", UserRole::Guest, &config)
                .unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..config
        };

        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = JwtConfig {
            access_token_expiry: -300,
            ..get_test_jwt_config()
        };
        let token =
            create_access_token(Uuid::new_v4(), "ada@example.com", UserRole::Guest, &config)
                .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_refresh_token(user_id, "ada@example.com", &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let first = create_refresh_token(user_id, "ada@example.com", &config).unwrap();
        let second = create_refresh_token(user_id, "ada@example.com", &config).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let access =
            create_access_token(user_id, "ada@example.com", UserRole::Teacher, &config).unwrap();
        let refresh = create_refresh_token(user_id, "ada@example.com", &config).unwrap();

        assert!(verify_refresh_token(&access, &config).is_err());
        assert!(verify_token(&refresh, &config).is_err());
    }

    #[test]
    fn test_refresh_token_expiry_longer_than_access() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let access =
            create_access_token(user_id, "ada@example.com", UserRole::Teacher, &config).unwrap();
        let refresh = create_refresh_token(user_id, "ada@example.com", &config).unwrap();

        let access_claims = verify_token(&access, &config).unwrap();
        let refresh_claims = verify_refresh_token(&refresh, &config).unwrap();

        assert!(refresh_claims.exp > access_claims.exp);
    }
}
