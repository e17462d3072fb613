use std::time::Duration;

use anyhow::Context;
use classroom_cache::{CacheConfig, RedisCache};
use classroom_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
use classroom_db::{DatabaseConfig, init_db_pool};
use sqlx::PgPool;
use tracing::{info, warn};

const CACHE_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub server_config: ServerConfig,
    /// `None` when `REDIS_URL` is unset or Redis was unreachable at startup.
    pub cache: Option<RedisCache>,
}

pub async fn init_app_state(server_config: ServerConfig) -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let db = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    let cache_config = CacheConfig::from_env();
    let cache = connect_cache(&cache_config).await;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(server_config.environment),
        rate_limit_config: RateLimitConfig::from_env(),
        server_config,
        cache,
    })
}

async fn connect_cache(config: &CacheConfig) -> Option<RedisCache> {
    let url = match config.redis_url.as_deref() {
        Some(url) => url,
        None => {
            warn!("REDIS_URL not set, running without a cache");
            return None;
        }
    };

    match tokio::time::timeout(CACHE_CONNECT_TIMEOUT, RedisCache::new(url, config)).await {
        Ok(Ok(cache)) => {
            info!("Connected to Redis cache");
            Some(cache)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Redis unavailable, running without a cache");
            None
        }
        Err(_) => {
            warn!("Timed out connecting to Redis, running without a cache");
            None
        }
    }
}
