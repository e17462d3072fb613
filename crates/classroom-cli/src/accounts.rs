//! Interactive account creation.

use classroom_core::{UserRole, hash_password, validate_password_strength};
use classroom_db::{is_unique_violation, violated_constraint};
use classroom_models::UserId;
use sqlx::PgPool;

pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password: String,
}

impl NewAccount {
    /// The same strength rules registration applies.
    pub fn check_password(&self) -> Result<(), Vec<String>> {
        validate_password_strength(
            &self.password,
            &[
                ("username", self.username.as_str()),
                ("email address", self.email.as_str()),
                ("first name", self.first_name.as_str()),
                ("last name", self.last_name.as_str()),
            ],
        )
    }
}

pub async fn create_account(
    db: &PgPool,
    account: &NewAccount,
) -> Result<UserId, Box<dyn std::error::Error>> {
    if let Err(problems) = account.check_password() {
        return Err(problems.join(" ").into());
    }

    let password_hash = hash_password(&account.password).map_err(|e| e.error.to_string())?;

    let result = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (email, username, first_name, last_name, role, password)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(account.email.trim().to_lowercase())
    .bind(account.username.trim())
    .bind(account.first_name.trim())
    .bind(account.last_name.trim())
    .bind(account.role)
    .bind(&password_hash)
    .fetch_one(db)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => match violated_constraint(&e) {
            Some("users_username_key") => Err("A user with that username already exists".into()),
            _ => Err("A user with that email already exists".into()),
        },
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(password: &str) -> NewAccount {
        NewAccount {
            email: "mentor@school.test".to_string(),
            username: "mentor".to_string(),
            first_name: "Barbara".to_string(),
            last_name: "Liskov".to_string(),
            role: UserRole::Teacher,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(account("Substitution-Principle-87").check_password().is_ok());
    }

    #[test]
    fn test_password_resembling_name_rejected() {
        assert!(account("liskov1974").check_password().is_err());
    }
}
