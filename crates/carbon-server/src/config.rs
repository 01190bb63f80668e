//! Server configuration from environment.

use std::env;
use std::time::Duration;

pub const APP_NAME: &str = "Carbon Emission Calculator";
pub const API_PREFIX: &str = "/api/v1";

const DEV_JWT_SECRET: &str = "dev-secret-change-me-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub database_path: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    /// Empty leaves geocoding and road routing unavailable.
    pub mapbox_access_token: String,
    pub geocoding_timeout: Duration,
    pub directions_timeout: Duration,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    pub search_rate_limit_rps: u32,
    pub trust_proxy: bool,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: parsed("CARBON_PORT", 8000),
            environment: env::var("CARBON_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            database_path: env::var("CARBON_DATABASE_PATH")
                .unwrap_or_else(|_| "data/carbon.db".to_string()),
            database_max_connections: parsed("CARBON_DATABASE_MAX_CONNECTIONS", 5),
            jwt_secret: env::var("CARBON_JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            jwt_expire_minutes: parsed("CARBON_JWT_EXPIRE_MINUTES", 30),
            mapbox_access_token: env::var("MAPBOX_ACCESS_TOKEN").unwrap_or_default(),
            geocoding_timeout: Duration::from_secs(parsed("CARBON_GEOCODING_TIMEOUT_S", 15)),
            directions_timeout: Duration::from_secs(parsed("CARBON_DIRECTIONS_TIMEOUT_S", 30)),
            cors_origins: env::var("CARBON_CORS_ORIGINS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
            rate_limit_enabled: parsed("CARBON_RATE_LIMIT_ENABLED", true),
            search_rate_limit_rps: parsed("CARBON_SEARCH_RATE_LIMIT_RPS", 5),
            trust_proxy: parsed("CARBON_TRUST_PROXY", false),
            log_json: env::var("CARBON_LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_list_is_trimmed() {
        assert_eq!(
            split_list(" http://localhost:3000, ,http://127.0.0.1:3000 "),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert!(split_list("").is_empty());
    }
}
