use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DATABASE_URL: &str = "sqlite://farmlink.db?mode=rwc";
const MIN_SESSION_SECRET_LEN: usize = 32;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Session signing secret. Optional in development; mandatory in
    /// production (startup aborts without it).
    #[serde(default)]
    pub session_secret: Option<String>,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Social login: Google OAuth client credentials (both or neither)
    #[serde(default)]
    pub google_client_id: Option<String>,
    #[serde(default)]
    pub google_client_secret: Option<String>,

    /// Social login: Facebook app credentials (both or neither)
    #[serde(default)]
    pub facebook_app_id: Option<String>,
    #[serde(default)]
    pub facebook_app_secret: Option<String>,
}

impl AppConfig {
    /// Builds a configuration from explicit values, applying defaults for the
    /// rest. Intended for tests and embedded setups.
    pub fn new(database_url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            environment: environment.into(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            session_secret: None,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            google_client_id: None,
            google_client_secret: None,
            facebook_app_id: None,
            facebook_app_secret: None,
        }
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Constraints that depend on the environment or span multiple fields,
    /// which `validator`'s per-field derive cannot express.
    pub fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.is_production() {
            match &self.session_secret {
                None => {
                    errors.add(
                        "session_secret",
                        ValidationError::new("required_in_production"),
                    );
                }
                Some(secret) if secret.len() < MIN_SESSION_SECRET_LEN => {
                    errors.add("session_secret", ValidationError::new("too_short"));
                }
                Some(_) => {}
            }

            if self.database_url == DEFAULT_DATABASE_URL {
                errors.add("database_url", ValidationError::new("default_in_production"));
            }
        }

        if self.google_client_id.is_some() != self.google_client_secret.is_some() {
            errors.add("google_client_id", ValidationError::new("incomplete_pair"));
        }
        if self.facebook_app_id.is_some() != self.facebook_app_secret.is_some() {
            errors.add("facebook_app_id", ValidationError::new("incomplete_pair"));
        }

        if self.db_min_connections > self.db_max_connections {
            errors.add("db_min_connections", ValidationError::new("exceeds_max"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Errors raised while loading or validating configuration. All of them are
/// fatal at process startup.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_db_connect_timeout_secs() -> u64 {
    30
}

fn default_db_idle_timeout_secs() -> u64 {
    600
}

fn default_db_acquire_timeout_secs() -> u64 {
    8
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("farmlink_api={},migrations={}", level, level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP_*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_config_does_not_require_session_secret() {
        let cfg = AppConfig::new("sqlite::memory:", "development");
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn production_config_requires_session_secret() {
        let cfg = AppConfig::new("postgres://db/farmlink", "production");
        let err = cfg
            .validate_additional_constraints()
            .expect_err("missing secret must fail");
        assert!(err.field_errors().contains_key("session_secret"));
    }

    #[test]
    fn production_rejects_short_session_secret() {
        let mut cfg = AppConfig::new("postgres://db/farmlink", "production");
        cfg.session_secret = Some("short".into());
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn production_accepts_complete_config() {
        let mut cfg = AppConfig::new("postgres://db/farmlink", "production");
        cfg.session_secret = Some("a".repeat(MIN_SESSION_SECRET_LEN));
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn production_rejects_built_in_database_url() {
        let mut cfg = AppConfig::new(DEFAULT_DATABASE_URL, "production");
        cfg.session_secret = Some("a".repeat(MIN_SESSION_SECRET_LEN));
        let err = cfg
            .validate_additional_constraints()
            .expect_err("default db url must fail");
        assert!(err.field_errors().contains_key("database_url"));
    }

    #[test]
    fn social_login_credentials_must_come_in_pairs() {
        let mut cfg = AppConfig::new("sqlite::memory:", "development");
        cfg.google_client_id = Some("client-id".into());
        assert!(cfg.validate_additional_constraints().is_err());

        cfg.google_client_secret = Some("client-secret".into());
        assert!(cfg.validate_additional_constraints().is_ok());
    }
}
