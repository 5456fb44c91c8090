use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Secret used to sign tokens in development when `JWT_SECRET` is not set.
const DEVELOPMENT_JWT_SECRET: &str = "storefront-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_slow_query_warning: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum query length after trimming
    pub min_query_length: usize,
    /// Maximum records returned per entity type
    pub per_type_limit: usize,
    /// Characters kept from the descriptive field of each hit
    pub subtitle_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        override_from("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_from("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);
        override_from("DATABASE_ENABLE_SLOW_QUERY_WARNING", &mut self.database.enable_slow_query_warning);
        override_from("DATABASE_SLOW_QUERY_THRESHOLD_MS", &mut self.database.slow_query_threshold_ms);

        // API_PORT wins over the generic PORT most hosts set
        override_from("PORT", &mut self.api.port);
        override_from("API_PORT", &mut self.api.port);
        override_from("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging);

        if let Ok(secret) = env::var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        override_from("SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours);
        if let Ok(origins) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        override_from("SECURITY_ENABLE_AUDIT_LOGGING", &mut self.security.enable_audit_logging);

        override_from("SEARCH_MIN_QUERY_LENGTH", &mut self.search.min_query_length);
        override_from("SEARCH_PER_TYPE_LIMIT", &mut self.search.per_type_limit);

        override_from("PAGINATION_DEFAULT_PER_PAGE", &mut self.pagination.default_per_page);
        override_from("PAGINATION_MAX_PER_PAGE", &mut self.pagination.max_per_page);

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 100,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enable_audit_logging: false,
            },
            search: SearchConfig::default(),
            pagination: PaginationConfig {
                default_per_page: 15,
                max_per_page: 100,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 500,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.example.com".to_string()],
                enable_audit_logging: true,
            },
            search: SearchConfig::default(),
            pagination: PaginationConfig {
                default_per_page: 15,
                max_per_page: 100,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 1000,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://admin.example.com".to_string()],
                enable_audit_logging: true,
            },
            search: SearchConfig::default(),
            pagination: PaginationConfig {
                default_per_page: 15,
                max_per_page: 50,
            },
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            per_type_limit: 10,
            subtitle_length: 100,
        }
    }
}

/// Replace `slot` with the parsed value of `key`; unparsable values are ignored with a warning
fn override_from<T: FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = env::var(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.jwt_secret, DEVELOPMENT_JWT_SECRET);
        assert_eq!(config.pagination.max_per_page, 100);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.pagination.max_per_page, 50);
        assert!(config.security.enable_audit_logging);
    }

    #[test]
    fn test_search_defaults_are_shared() {
        for config in [AppConfig::development(), AppConfig::staging(), AppConfig::production()] {
            assert_eq!(config.search.min_query_length, 2);
            assert_eq!(config.search.per_type_limit, 10);
            assert_eq!(config.search.subtitle_length, 100);
        }
    }
}
