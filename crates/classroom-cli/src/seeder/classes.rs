//! Fake classes and enrollments.

use classroom_models::{ClassCode, ClassId, UserId};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::ClassSeed;

const SUBJECTS: &[&str] = &[
    "Algorithms",
    "Biology",
    "Calculus",
    "Chemistry",
    "Databases",
    "Economics",
    "Geometry",
    "History",
    "Linear Algebra",
    "Literature",
    "Networks",
    "Operating Systems",
    "Physics",
    "Statistics",
];

pub fn generate_classes(teacher_ids: &[UserId], per_teacher: usize) -> Vec<ClassSeed> {
    teacher_ids
        .par_iter()
        .flat_map(|&teacher_id| {
            let mut rng = rand::thread_rng();
            (0..per_teacher)
                .map(|section| {
                    let subject = SUBJECTS.choose(&mut rng).copied().unwrap_or("Seminar");
                    ClassSeed {
                        name: format!("{} {}", subject, section + 1),
                        code: ClassCode::generate(),
                        description: Sentence(4..10).fake(),
                        teacher_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Inserts classes one by one; a code collision skips that class.
pub async fn seed_classes(
    db: &PgPool,
    teacher_ids: &[UserId],
    per_teacher: usize,
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classes...", teacher_ids.len() * per_teacher);

    let classes = generate_classes(teacher_ids, per_teacher);
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(classes.len());

    for class in &classes {
        let id = sqlx::query_scalar::<_, ClassId>(
            "INSERT INTO classes (name, code, description, teacher_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (code) DO NOTHING
             RETURNING id",
        )
        .bind(&class.name)
        .bind(&class.code)
        .bind(&class.description)
        .bind(class.teacher_id)
        .fetch_optional(&mut *tx)
        .await?;
        ids.extend(id);
    }

    tx.commit().await?;

    let skipped = classes.len() - ids.len();
    println!(
        "   ✓ Inserted {} classes in {:?}{}",
        ids.len(),
        start_time.elapsed(),
        if skipped > 0 {
            format!(" ({} skipped on code collision)", skipped)
        } else {
            String::new()
        }
    );
    Ok(ids)
}

/// Picks up to `per_student` distinct classes for each student.
pub fn generate_enrollments(
    student_ids: &[UserId],
    class_ids: &[ClassId],
    per_student: usize,
) -> Vec<(UserId, ClassId)> {
    student_ids
        .par_iter()
        .flat_map(|&student_id| {
            let mut rng = rand::thread_rng();
            class_ids
                .choose_multiple(&mut rng, per_student)
                .map(|&class_id| (student_id, class_id))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_enrollments(
    db: &PgPool,
    student_ids: &[UserId],
    class_ids: &[ClassId],
    per_student: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let pairs = generate_enrollments(student_ids, class_ids, per_student);
    println!("📝 Seeding {} enrollments...", pairs.len());

    let mut inserted = 0;
    let mut tx = db.begin().await?;
    // 2 params per enrollment
    for chunk in pairs.chunks(5000) {
        let mut query = String::from("INSERT INTO enrollments (student_id, class_id) VALUES ");
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        }
        query.push_str(" ON CONFLICT (student_id, class_id) DO NOTHING");

        let mut q = sqlx::query(&query);
        for (student_id, class_id) in chunk {
            q = q.bind(*student_id).bind(*class_id);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;

    println!("   ✓ Inserted {} enrollments in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}
