use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when every dependency answered, otherwise `unhealthy`.
    #[schema(example = "healthy")]
    pub status: String,
    pub database: bool,
    pub cache: bool,
    pub version: String,
}

impl HealthResponse {
    pub fn new(database: bool, cache: bool, version: &str) -> Self {
        let status = if database && cache {
            "healthy"
        } else {
            "unhealthy"
        };
        Self {
            status: status.to_string(),
            database,
            cache,
            version: version.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.database && self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_failed_probe_is_unhealthy() {
        assert!(HealthResponse::new(true, true, "0.1.0").is_healthy());
        assert_eq!(HealthResponse::new(true, false, "0.1.0").status, "unhealthy");
        assert_eq!(HealthResponse::new(false, true, "0.1.0").status, "unhealthy");
    }
}
