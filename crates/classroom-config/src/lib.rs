//! # Classroom Config
//!
//! Configuration types for the Classroom API.
//!
//! Every structure is loaded from environment variables with sensible
//! defaults for local development:
//!
//! - [`server`]: Deployment environment, bind address and allowed hosts
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: Rate limiting for public authentication endpoints
//!
//! # Example
//!
//! ```ignore
//! use classroom_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env(server.environment);
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

mod env_util;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{Environment, ServerConfig};
