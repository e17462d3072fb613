//! Redis cache configuration.
//!
//! # Environment Variables
//!
//! - `REDIS_URL`: Redis connection URL. Unset means no cache is configured.
//! - `CACHE_TTL_SECONDS`: Default TTL for cached items in seconds (default: `300`)
//! - `CACHE_PREFIX`: Prefix for all cache keys (default: `classroom`)

use std::env;

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub default_ttl_seconds: u64,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl_seconds),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    /// `classroom:health:<id>` for a prefix of `classroom`.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl_seconds: 300,
            key_prefix: "classroom".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        let config = CacheConfig::default();
        assert_eq!(config.prefixed_key("health:abc"), "classroom:health:abc");
    }

    #[test]
    fn test_no_url_by_default() {
        assert!(CacheConfig::default().redis_url.is_none());
    }
}
