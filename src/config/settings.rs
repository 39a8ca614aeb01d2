//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_API_VERSION, DEFAULT_DAYS_TO_FORM_HABIT, DEFAULT_JWT_EXPIRE_MINUTES,
    DEFAULT_LOG_LEVEL, DEFAULT_POSTGRES_HOST, DEFAULT_POSTGRES_PORT, DEFAULT_PROJECT_NAME,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MAX_JWT_EXPIRE_MINUTES, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub project_name: String,
    pub api_version: String,
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub development: bool,
    jwt_secret: String,
    pub jwt_expire_minutes: i64,
    api_bot_shared_key: String,
    pub days_to_form_habit: i32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("project_name", &self.project_name)
            .field("api_version", &self.api_version)
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("development", &self.development)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expire_minutes", &self.jwt_expire_minutes)
            .field("api_bot_shared_key", &"[REDACTED]")
            .field("days_to_form_habit", &self.days_to_form_habit)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// `DATABASE_URL` wins over the individual `POSTGRES_*` variables.
    /// `JWT_SECRET_KEY` and `API_BOT_SHARED_KEY` fall back to development
    /// defaults only in debug builds.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = required_secret("JWT_SECRET_KEY", "dev-secret-key-minimum-32-chars!!")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET_KEY must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        let api_bot_shared_key = required_secret("API_BOT_SHARED_KEY", "dev-bot-key")?;

        Ok(Self {
            project_name: env::var("PROJECT_NAME")
                .unwrap_or_else(|_| DEFAULT_PROJECT_NAME.to_string()),
            api_version: env::var("API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            database_url: database_url_from_env()?,
            server_host: env::var("API_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parsed_var("API_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            development: parsed_var("DEVELOPMENT").unwrap_or(cfg!(debug_assertions)),
            jwt_secret,
            jwt_expire_minutes: token_lifetime(parsed_var("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")),
            api_bot_shared_key,
            days_to_form_habit: parsed_var("DAYS_TO_FORM_HABIT")
                .filter(|days: &i32| *days > 0)
                .unwrap_or(DEFAULT_DAYS_TO_FORM_HABIT),
        })
    }

    /// `LOG_LEVEL` (lowercased), read on its own so logging can start before
    /// the rest of the configuration is loaded.
    pub fn log_level_from_env() -> String {
        dotenvy::dotenv().ok();
        env::var("LOG_LEVEL")
            .map(|level| level.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Build a configuration for an explicit database URL.
    ///
    /// Used by tests and tooling that do not read the environment.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            database_url: database_url.into(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            development: true,
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expire_minutes: DEFAULT_JWT_EXPIRE_MINUTES,
            api_bot_shared_key: "test-bot-key".to_string(),
            days_to_form_habit: DEFAULT_DAYS_TO_FORM_HABIT,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Check a presented bot key against the configured one.
    pub fn is_valid_bot_key(&self, presented: &str) -> bool {
        !presented.is_empty() && presented == self.api_bot_shared_key
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Token lifetime in minutes; out-of-range values fall back to the default
fn token_lifetime(minutes: Option<i64>) -> i64 {
    match minutes {
        Some(minutes) if (1..=MAX_JWT_EXPIRE_MINUTES).contains(&minutes) => minutes,
        Some(minutes) => {
            tracing::warn!(
                minutes,
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES out of range, using {}",
                DEFAULT_JWT_EXPIRE_MINUTES
            );
            DEFAULT_JWT_EXPIRE_MINUTES
        }
        None => DEFAULT_JWT_EXPIRE_MINUTES,
    }
}

fn required_secret(name: &str, dev_default: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using insecure default for development", name);
            Ok(dev_default.to_string())
        }
        Err(_) => Err(AppError::config(format!(
            "{} environment variable must be set in production",
            name
        ))),
    }
}

fn database_url_from_env() -> AppResult<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let user = env::var("POSTGRES_USER")
        .map_err(|_| AppError::config("DATABASE_URL or POSTGRES_USER must be set"))?;
    let password = env::var("POSTGRES_PASSWORD")
        .map_err(|_| AppError::config("POSTGRES_PASSWORD must be set"))?;
    let db = env::var("POSTGRES_DB").map_err(|_| AppError::config("POSTGRES_DB must be set"))?;
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = parsed_var("POSTGRES_PORT").unwrap_or(DEFAULT_POSTGRES_PORT);

    Ok(postgres_url(&user, &password, &host, port, &db))
}

/// Compose a PostgreSQL connection URL from its parts.
pub fn postgres_url(user: &str, password: &str, host: &str, port: u16, db: &str) -> String {
    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_url() {
        assert_eq!(
            postgres_url("habits", "secret", "db", 5432, "habits_db"),
            "postgres://habits:secret@db:5432/habits_db"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::for_database("postgres://u:p@localhost/db");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("u:p@localhost"));
        assert!(!debug.contains("test-bot-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_bot_key_check() {
        let config = Config::for_database("sqlite::memory:");
        assert!(config.is_valid_bot_key("test-bot-key"));
        assert!(!config.is_valid_bot_key("wrong"));
        assert!(!config.is_valid_bot_key(""));
    }

    #[test]
    fn test_token_lifetime_bounds() {
        assert_eq!(token_lifetime(None), DEFAULT_JWT_EXPIRE_MINUTES);
        assert_eq!(token_lifetime(Some(90)), 90);
        assert_eq!(token_lifetime(Some(0)), DEFAULT_JWT_EXPIRE_MINUTES);
        assert_eq!(token_lifetime(Some(-5)), DEFAULT_JWT_EXPIRE_MINUTES);
        assert_eq!(token_lifetime(Some(i64::MAX)), DEFAULT_JWT_EXPIRE_MINUTES);
        assert_eq!(
            token_lifetime(Some(MAX_JWT_EXPIRE_MINUTES)),
            MAX_JWT_EXPIRE_MINUTES
        );
    }

    #[test]
    fn test_server_addr() {
        let config = Config::for_database("sqlite::memory:");
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
    }
}
