//! Fake teacher and student accounts.

use classroom_core::UserRole;
use classroom_models::UserId;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

// 6 params per user
const BATCH_SIZE: usize = 1000;

fn slug(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Generates accounts in parallel. `run_id` keeps usernames unique across
/// repeated seeding runs.
pub fn generate_users(
    role: UserRole,
    count: usize,
    run_id: &str,
    password_hash: &str,
) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let username = format!(
                "{}.{}.{}{}.{}",
                slug(&first_name),
                slug(&last_name),
                role.as_str(),
                idx,
                run_id
            );

            UserSeed {
                email: format!("{}@{}", username, SEED_EMAIL_DOMAIN),
                username,
                first_name,
                last_name,
                role,
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

pub async fn seed_users(
    db: &PgPool,
    role: UserRole,
    count: usize,
    run_id: &str,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} {}s...", count, role);

    let users = generate_users(role, count, run_id, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!("   ✓ Inserted {} {}s in {:?}", ids.len(), role, start_time.elapsed());
    Ok(ids)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (email, username, first_name, last_name, role, password) VALUES ",
    );
    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, UserId>(&query);
    for user in users {
        q = q
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(&user.password_hash);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Removes every account under the seed domain. Their classes and
/// enrollments cascade.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_users_are_unique_and_under_seed_domain() {
        let users = generate_users(UserRole::Student, 50, "abc123", "hash");
        let usernames: HashSet<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(usernames.len(), 50);
        assert!(users.iter().all(|u| u.email.ends_with("@seed.classroom.test")));
        assert!(users.iter().all(|u| u.role == UserRole::Student));
    }

    #[test]
    fn test_slug_strips_punctuation() {
        assert_eq!(slug("O'Connor-Smith"), "oconnorsmith");
    }
}
