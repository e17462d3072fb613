//! Database seeding with fake teachers, classes and students.
//!
//! Row generation runs in parallel with Rayon; inserts are batched inside a
//! transaction per table.

pub mod classes;
pub mod models;
pub mod users;

pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig};

use classroom_core::{UserRole, hash_password};
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

pub struct SeedSummary {
    pub teachers: usize,
    pub classes: usize,
    pub students: usize,
    pub enrollments: u64,
}

pub async fn seed_all(
    db: &PgPool,
    config: SeedConfig,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| e.error.to_string())?;
    let run_id = Uuid::new_v4().simple().to_string()[..6].to_string();

    let teacher_ids =
        users::seed_users(db, UserRole::Teacher, config.teachers, &run_id, &password_hash).await?;
    let class_ids = classes::seed_classes(db, &teacher_ids, config.classes_per_teacher).await?;
    let student_ids =
        users::seed_users(db, UserRole::Student, config.students, &run_id, &password_hash).await?;
    let enrollments = classes::seed_enrollments(
        db,
        &student_ids,
        &class_ids,
        config.enrollments_per_student,
    )
    .await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Seeded accounts use the password: {}", SEED_PASSWORD);

    Ok(SeedSummary {
        teachers: teacher_ids.len(),
        classes: class_ids.len(),
        students: student_ids.len(),
        enrollments,
    })
}

/// Deletes every seeded account along with its classes and enrollments.
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    println!("🧹 Clearing seeded data...");
    let removed = users::clear_users(db).await?;
    println!("   ✓ Removed {} seeded accounts", removed);
    Ok(removed)
}
