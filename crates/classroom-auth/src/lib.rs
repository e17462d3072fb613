//! # Classroom Auth
//!
//! JWT claim structures and token utilities.
//!
//! Two kinds of token are issued, each stamped with a `token_type` claim so
//! one can never stand in for the other:
//!
//! - **Access Token** ([`Claims`]): Short-lived, carries the caller's role
//! - **Refresh Token** ([`RefreshTokenClaims`]): Long-lived, exchanged for new access tokens
//!
//! # Example
//!
//! ```ignore
//! use classroom_auth::{create_access_token, verify_token};
//! use classroom_config::JwtConfig;
//! use classroom_core::UserRole;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "ada@example.com", UserRole::Teacher, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.role.is_teacher());
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims, TokenType};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
