//! # Classroom Models
//!
//! Domain models and DTOs for the Classroom API: database rows,
//! request/response bodies and their validation rules.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity ids
//! - [`class_code`]: The six-character join code
//! - [`users`]: Accounts, registration and profile updates
//! - [`auth`]: Login, token pair and refresh bodies
//! - [`classes`]: Classes, enrollments and their responses
//! - [`health`]: Health check response

pub mod auth;
pub mod class_code;
pub mod classes;
pub mod health;
pub mod ids;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, TokenPair};
pub use class_code::{CLASS_CODE_LENGTH, ClassCode, InvalidClassCode};
pub use classes::{
    Class, ClassResponse, ClassRow, CreateClassDto, EnrollResponse, EnrolledStudent,
    EnrolledStudentRow, UpdateClassDto,
};
pub use health::HealthResponse;
pub use ids::{ClassId, EnrollmentId, UserId};
pub use users::{RegisterRequestDto, UpdateProfileDto, User, UserCredentials};
