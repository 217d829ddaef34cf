use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    /// Directory holding the built frontend, served behind the auth gate
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub auth_mode: AuthMode,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub session_cookie_name: String,
    pub require_https: bool,
    pub cors_origins: Vec<String>,
    pub login_path: String,
    pub default_landing_path: String,
    /// Page prefixes that require an authenticated session
    pub protected_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Users table + locally signed JWTs
    Local,
    /// Identity is owned by the upstream service
    Upstream,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub whoami_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,

    #[error("AUTH_MODE=upstream requires UPSTREAM_URL")]
    MissingUpstream,

    #[error("Invalid UPSTREAM_URL: {0}")]
    InvalidUpstreamUrl(String),
}

const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

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
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("FINANCE_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.api.static_dir = Some(v).filter(|s| !s.is_empty());
        }

        // Security overrides
        if let Ok(v) = env::var("AUTH_MODE") {
            self.security.auth_mode = match v.as_str() {
                "upstream" => AuthMode::Upstream,
                _ => AuthMode::Local,
            };
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.security.session_cookie_name = v;
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("LOGIN_PATH") {
            self.security.login_path = v;
        }
        if let Ok(v) = env::var("DEFAULT_LANDING_PATH") {
            self.security.default_landing_path = v;
        }
        if let Ok(v) = env::var("PROTECTED_PATHS") {
            self.security.protected_paths = split_list(&v);
        }

        // Upstream overrides
        if let Ok(v) = env::var("UPSTREAM_URL") {
            self.upstream.base_url = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("UPSTREAM_WHOAMI_PATH") {
            self.upstream.whoami_path = v;
        }
        if let Ok(v) = env::var("UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = v.parse().unwrap_or(self.upstream.timeout_secs);
        }

        self
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment != Environment::Development
            && (self.security.jwt_secret.is_empty() || self.security.jwt_secret == DEV_JWT_SECRET)
        {
            return Err(ConfigError::MissingJwtSecret);
        }
        match (&self.security.auth_mode, &self.upstream.base_url) {
            (AuthMode::Upstream, None) => return Err(ConfigError::MissingUpstream),
            (_, Some(u)) => {
                url::Url::parse(u).map_err(|_| ConfigError::InvalidUpstreamUrl(u.clone()))?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn is_protected_path(&self, path: &str) -> bool {
        self.security.protected_paths.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .map(|rest| rest.starts_with('/'))
                    .unwrap_or(false)
        })
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://financas.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                static_dir: None,
            },
            security: SecurityConfig {
                auth_mode: AuthMode::Local,
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                session_cookie_name: "session".to_string(),
                require_https: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                login_path: "/login".to_string(),
                default_landing_path: "/dashboard".to_string(),
                protected_paths: default_protected_paths(),
            },
            upstream: UpstreamConfig {
                base_url: None,
                whoami_path: "/api/v1/auth/whoami".to_string(),
                timeout_secs: 10,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.api.max_request_size_bytes = 5 * 1024 * 1024;
        config.security.jwt_secret = String::new();
        config.security.jwt_expiry_hours = 24;
        config.security.require_https = true;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 10;
        config.database.connection_timeout = 5;
        config.api.enable_request_logging = false;
        config.api.max_request_size_bytes = 5 * 1024 * 1024;
        config.security.jwt_secret = String::new();
        config.security.jwt_expiry_hours = 12;
        config.security.require_https = true;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config
    }
}

fn default_protected_paths() -> Vec<String> {
    ["/dashboard", "/transactions", "/budget", "/upload", "/settings"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
