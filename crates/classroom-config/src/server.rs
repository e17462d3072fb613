//! Deployment environment and HTTP server settings.
//!
//! # Environment Variables
//!
//! - `ENVIRONMENT`: `development` (default) or `production`
//! - `SERVER_HOST`: Bind address (default: `0.0.0.0`)
//! - `SERVER_PORT`: Bind port (default: `3000`)
//! - `ALLOWED_HOSTS`: Comma-separated `Host` header values accepted in
//!   production. A leading `.` matches the domain and all subdomains, `*`
//!   matches anything.
//! - `LOG_DIR`: Directory for rolling log files (default: `storage/logs`)

use std::env;
use std::fmt;

use crate::env_util::{parse_or, split_list};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Unknown values fall back to development.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub allowed_hosts: Vec<String>,
    pub log_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "0.0.0.0".to_string(),
            ],
            log_dir: "storage/logs".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let allowed_hosts = match env::var("ALLOWED_HOSTS") {
            Ok(raw) => split_list(&raw),
            // Production refuses every host until ALLOWED_HOSTS is configured.
            Err(_) if environment.is_production() => Vec::new(),
            Err(_) => defaults.allowed_hosts,
        };

        Self {
            environment,
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or("SERVER_PORT", defaults.port),
            allowed_hosts,
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the `Host` header must be checked against [`Self::allowed_hosts`].
    pub fn enforces_allowed_hosts(&self) -> bool {
        self.environment.is_production()
    }

    /// Matches a `Host` header value (port ignored) against the allowed list.
    pub fn is_host_allowed(&self, host_header: &str) -> bool {
        let host = strip_port(host_header).to_lowercase();
        if host.is_empty() {
            return false;
        }

        self.allowed_hosts.iter().any(|pattern| {
            let pattern = pattern.to_lowercase();
            if pattern == "*" {
                true
            } else if let Some(domain) = pattern.strip_prefix('.') {
                host == domain || host.ends_with(&pattern)
            } else {
                host == pattern
            }
        })
    }
}

fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        // IPv6 literal, e.g. [::1]:3000
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
