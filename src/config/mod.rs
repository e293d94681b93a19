use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret used when no JWT_SECRET is configured in development.
const DEV_JWT_SECRET: &str = "campus-events-development-secret";

/// Upper bound on token lifetime (one year).
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub store: StoreKind,
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Emails granted admin privilege regardless of the stored flag.
    pub admin_users: Vec<String>,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

impl AppConfig {
    /// Reads the process environment once. Call at startup and pass the value on.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("CAMPUS_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse("PORT", &v)?;
        }

        // Database
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("STORE") {
            self.database.store = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreKind::Postgres,
                "memory" | "in-memory" => StoreKind::Memory,
                _ => return Err(ConfigError::Invalid { key: "STORE", value: v }),
            };
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = parse("DATABASE_RUN_MIGRATIONS", &v)?;
        }

        // API
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse("API_ENABLE_REQUEST_LOGGING", &v)?;
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", &v)?;
        }

        // Security
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse("SECURITY_ENABLE_CORS", &v)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = parse("SECURITY_JWT_EXPIRY_HOURS", &v)?;
        }
        if let Some(v) = lookup("ADMIN_USERS") {
            self.security.admin_users = split_list(&v)
                .into_iter()
                .map(|email| email.to_lowercase())
                .collect();
        }
        if let Some(v) = lookup("PASSWORD_MEMORY_KIB") {
            self.security.password_memory_kib = parse("PASSWORD_MEMORY_KIB", &v)?;
        }
        if let Some(v) = lookup("PASSWORD_ITERATIONS") {
            self.security.password_iterations = parse("PASSWORD_ITERATIONS", &v)?;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.database.store == StoreKind::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let expiry = self.security.jwt_expiry_hours;
        if expiry == 0 || expiry > MAX_JWT_EXPIRY_HOURS {
            return Err(ConfigError::Invalid {
                key: "SECURITY_JWT_EXPIRY_HOURS",
                value: expiry.to_string(),
            });
        }
        Ok(())
    }

    /// True when no JWT_SECRET was supplied and the built-in development secret is in use.
    pub fn uses_development_secret(&self) -> bool {
        self.security.jwt_secret == DEV_JWT_SECRET
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5001 },
            database: DatabaseConfig {
                store: StoreKind::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
                admin_users: Vec::new(),
                password_memory_kib: argon2::Params::DEFAULT_M_COST,
                password_iterations: argon2::Params::DEFAULT_T_COST,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 5001 },
            database: DatabaseConfig {
                store: StoreKind::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_users: Vec::new(),
                password_memory_kib: argon2::Params::DEFAULT_M_COST,
                password_iterations: argon2::Params::DEFAULT_T_COST,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5001 },
            database: DatabaseConfig {
                store: StoreKind::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://events.example.edu".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_users: Vec::new(),
                password_memory_kib: argon2::Params::DEFAULT_M_COST,
                password_iterations: argon2::Params::DEFAULT_T_COST,
            },
        }
    }

    /// In-memory configuration with cheap password hashing, for tests.
    pub fn for_tests() -> Self {
        let mut config = Self::development();
        config.database.store = StoreKind::Memory;
        config.database.run_migrations = false;
        config.api.enable_request_logging = false;
        config.security.jwt_secret = "test-secret".to_string();
        config.security.admin_users = vec!["dean@campus.test".to_string()];
        config.security.password_memory_kib = argon2::Params::MIN_M_COST;
        config.security.password_iterations = argon2::Params::MIN_T_COST;
        config
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
