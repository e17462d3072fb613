//! User models and DTOs.

use chrono::{DateTime, Utc};
use classroom_core::UserRole;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::UserId;

pub const USERNAME_MAX_LENGTH: u64 = 150;

/// An account as exposed by the API. The password hash lives in
/// [`UserCredentials`] and never leaves the server.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

/// Letters, digits and `@ . + - _` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254)
    )]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        custom(function = "validate_username")
    )]
    #[schema(example = "ada")]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub confirm_password: String,
    #[serde(default)]
    pub role: UserRole,
}

impl RegisterRequestDto {
    /// Attribute values the password must not resemble.
    pub fn password_context(&self) -> [(&str, &str); 4] {
        [
            ("username", self.username.as_str()),
            ("email address", self.email.as_str()),
            ("first name", self.first_name.as_str()),
            ("last name", self.last_name.as_str()),
        ]
    }
}

/// Partial profile update. Absent fields are left unchanged; the role is
/// not part of the body and cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(email(message = "Enter a valid email address."), length(max = 254))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

impl UpdateProfileDto {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_body() -> serde_json::Value {
        json!({
            "email": "ada@example.com",
            "username": "ada.l",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "password": "analytical-engine",
            "confirm_password": "analytical-engine",
            "role": "teacher"
        })
    }

    #[test]
    fn test_register_dto_valid() {
        let dto: RegisterRequestDto = serde_json::from_value(register_body()).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.role, UserRole::Teacher);
    }

    #[test]
    fn test_register_role_defaults_to_guest() {
        let mut body = register_body();
        body.as_object_mut().unwrap().remove("role");
        let dto: RegisterRequestDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.role, UserRole::Guest);
    }

    #[test]
    fn test_register_unknown_role_rejected() {
        let mut body = register_body();
        body["role"] = json!("admin");
        assert!(serde_json::from_value::<RegisterRequestDto>(body).is_err());
    }

    #[test]
    fn test_register_bad_email_and_username() {
        let mut body = register_body();
        body["email"] = json!("not-an-email");
        body["username"] = json!("has spaces");
        let dto: RegisterRequestDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("grace.hopper+1@navy").is_ok());
        assert!(validate_username("under_score-dash").is_ok());
        assert!(validate_username("white space").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_user_serialization_hides_internal_fields() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: UserRole::Student,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 7);
        assert!(value.get("updated_at").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "student");
    }

    #[test]
    fn test_update_profile_ignores_role() {
        let dto: UpdateProfileDto =
            serde_json::from_value(json!({ "first_name": "Grace", "role": "teacher" })).unwrap();
        assert_eq!(dto.first_name.as_deref(), Some("Grace"));
        assert!(!dto.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_profile_validates_present_fields() {
        let dto = UpdateProfileDto {
            email: Some("nope".to_string()),
            ..UpdateProfileDto::default()
        };
        assert!(dto.validate().is_err());
        assert!(UpdateProfileDto::default().is_empty());
    }
}
