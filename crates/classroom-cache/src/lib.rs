//! # Classroom Cache
//!
//! Redis client shared by the API. The health check uses it to prove the
//! cache round-trips a value.
//!
//! # Example
//!
//! ```ignore
//! use classroom_cache::{CacheConfig, RedisCache};
//!
//! let config = CacheConfig::from_env();
//! if let Some(url) = config.redis_url.as_deref() {
//!     let cache = RedisCache::new(url, &config).await?;
//!     assert!(cache.health_probe().await);
//! }
//! ```

pub mod config;
pub mod redis;

pub use config::CacheConfig;
pub use self::redis::{CacheError, RedisCache};
