use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use classroom_cache::RedisCache;
use classroom_core::{AppError, UserRole};
use classroom_db::{is_unique_violation, violated_constraint};
use classroom_models::{RegisterRequestDto, UpdateProfileDto, User, UserCredentials, UserId};

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, role, created_at, updated_at";

pub struct UserService;

/// Emails are stored and looked up lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn profile_key(id: UserId) -> String {
    format!("user:{}", id)
}

/// Maps a unique violation on `users` to a 400 on the offending field.
fn map_user_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        return match violated_constraint(&e) {
            Some("users_username_key") => AppError::validation(
                "username",
                vec!["A user with that username already exists.".to_string()],
            ),
            _ => AppError::validation(
                "email",
                vec!["A user with that email already exists.".to_string()],
            ),
        };
    }
    error!(error = %e, "Database error writing user");
    AppError::database(e)
}

impl UserService {
    #[instrument(skip(db, cache), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_id(
        db: &PgPool,
        cache: Option<&RedisCache>,
        id: UserId,
    ) -> Result<User, AppError> {
        if let Some(cache) = cache
            && let Some(user) = cache.get::<User>(&profile_key(id)).await
        {
            debug!(user.id = %id, "User served from cache");
            return Ok(user);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %id, "Database error fetching user");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(cache) = cache
            && let Err(e) = cache.set(&profile_key(id), &user).await
        {
            warn!(error = %e, user.id = %id, "Failed to cache user");
        }

        Ok(user)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching credentials");
            AppError::database(e)
        })
    }

    /// Inserts a user. `password_hash` must already be hashed.
    #[instrument(skip(db, dto, password_hash), fields(user.role = %dto.role, db.operation = "INSERT", db.table = "users"))]
    pub async fn create(
        db: &PgPool,
        dto: &RegisterRequestDto,
        password_hash: &str,
    ) -> Result<User, AppError> {
        Self::insert(
            db,
            &dto.email,
            &dto.username,
            &dto.first_name,
            &dto.last_name,
            dto.role,
            password_hash,
        )
        .await
    }

    #[instrument(skip(db, password_hash), fields(db.operation = "INSERT", db.table = "users"))]
    pub async fn insert(
        db: &PgPool,
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, username, first_name, last_name, role, password)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(normalize_email(email))
        .bind(username.trim())
        .bind(first_name.trim())
        .bind(last_name.trim())
        .bind(role)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(map_user_write_error)?;

        info!(user.id = %user.id, user.role = %user.role, "User created");
        Ok(user)
    }

    /// Applies the fields present in `dto`. The role is never changed.
    #[instrument(skip(db, cache, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_profile(
        db: &PgPool,
        cache: Option<&RedisCache>,
        id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        if dto.is_empty() {
            return Self::find_by_id(db, cache, id).await;
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.email.as_deref().map(normalize_email))
        .bind(dto.username.as_deref().map(str::trim))
        .bind(dto.first_name.as_deref().map(str::trim))
        .bind(dto.last_name.as_deref().map(str::trim))
        .fetch_optional(db)
        .await
        .map_err(map_user_write_error)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(cache) = cache
            && let Err(e) = cache.invalidate(&profile_key(id)).await
        {
            warn!(error = %e, user.id = %id, "Failed to invalidate cached user");
        }

        info!(user.id = %user.id, "Profile updated");
        Ok(user)
    }
}
