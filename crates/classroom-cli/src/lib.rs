//! # Classroom CLI
//!
//! Account creation and database seeding for development and testing.
//!
//! ## Usage
//!
//! ```ignore
//! use classroom_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(3).with_classes_per_teacher(2).with_students(40);
//! seed_all(&pool, config).await?;
//! ```

pub mod accounts;
pub mod seeder;
