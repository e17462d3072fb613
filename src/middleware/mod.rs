//! Request gates applied before handlers run.
//!
//! - [`auth`]: Bearer-token authentication and per-action permission extractors
//! - [`hosts`]: `Host` header allow-list, enforced in production
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireCreateClass;
//!
//! // 401 without a token, 403 for non-teachers; the body is only parsed after.
//! async fn create_class(
//!     RequireCreateClass(auth_user): RequireCreateClass,
//!     ValidatedJson(dto): ValidatedJson<CreateClassDto>,
//! ) -> Result<impl IntoResponse, AppError> { ... }
//! ```

pub mod auth;
pub mod hosts;
