//! # Classroom Core
//!
//! Core types, errors, and rules shared by every Classroom crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing, verification and strength rules
//! - [`roles`]: The closed set of user roles and their capabilities
//! - [`permissions`]: Pure permission predicates evaluated per request
//!
//! # Example
//!
//! ```ignore
//! use classroom_core::{AppError, Permission, AccessKind, UserRole};
//!
//! let allowed = Permission::IsTeacherOrReadOnly.check(Some(UserRole::Student), AccessKind::Read);
//! assert!(allowed);
//!
//! let error = AppError::not_found("Class not found");
//! ```

pub mod errors;
pub mod password;
pub mod permissions;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, validate_password_strength, verify_password};
pub use permissions::{AccessKind, Action, Denial, Permission, authorize, evaluate, owns};
pub use roles::UserRole;
