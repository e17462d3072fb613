//! Seed row types and seeding configuration.

use classroom_core::UserRole;
use classroom_models::{ClassCode, UserId};

/// Every seeded account uses an address under this domain, which is how
/// `clear-seed` finds them again.
pub const SEED_EMAIL_DOMAIN: &str = "seed.classroom.test";

/// Password shared by all seeded accounts.
pub const SEED_PASSWORD: &str = "Seeded-Account-2024";

pub struct UserSeed {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password_hash: String,
}

pub struct ClassSeed {
    pub name: String,
    pub code: ClassCode,
    pub description: String,
    pub teacher_id: UserId,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub classes_per_teacher: usize,
    pub students: usize,
    /// Classes each student is enrolled in, capped by the number of classes.
    pub enrollments_per_student: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 5,
            classes_per_teacher: 3,
            students: 100,
            enrollments_per_student: 3,
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize) -> Self {
        Self {
            teachers,
            ..Self::default()
        }
    }

    pub fn with_classes_per_teacher(mut self, classes: usize) -> Self {
        self.classes_per_teacher = classes;
        self
    }

    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    pub fn with_enrollments_per_student(mut self, enrollments: usize) -> Self {
        self.enrollments_per_student = enrollments;
        self
    }

    pub fn total_classes(&self) -> usize {
        self.teachers * self.classes_per_teacher
    }
}
