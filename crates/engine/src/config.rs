use serde::Deserialize;

use domain::services::{EngineOptions, DEFAULT_CODE_GENERATION_ATTEMPTS};
use shared::validation::DEFAULT_MAX_GUEST_NAME_LENGTH;

/// Upper bound accepted for `invitations.code_generation_attempts`.
const MAX_CODE_GENERATION_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub invitations: InvitationConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvitationConfig {
    /// Attempts to find an unused code before giving up with a conflict.
    #[serde(default = "default_code_generation_attempts")]
    pub code_generation_attempts: u32,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            code_generation_attempts: default_code_generation_attempts(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_guest_name_length")]
    pub max_guest_name_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_guest_name_length: default_max_guest_name_length(),
        }
    }
}

// Default value functions
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_code_generation_attempts() -> u32 {
    DEFAULT_CODE_GENERATION_ATTEMPTS
}
fn default_max_guest_name_length() -> usize {
    DEFAULT_MAX_GUEST_NAME_LENGTH
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with RSVP__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RSVP").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults so tests do not depend on
    /// the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [invitations]
            code_generation_attempts = 10

            [limits]
            max_guest_name_length = 100
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Validation is left to the caller so tests can inspect partial configs.
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RSVP__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Unknown logging format '{}', expected json or pretty",
                self.logging.format
            )));
        }

        let attempts = self.invitations.code_generation_attempts;
        if attempts == 0 || attempts > MAX_CODE_GENERATION_ATTEMPTS {
            return Err(ConfigValidationError::InvalidValue(format!(
                "code_generation_attempts must be between 1 and {}",
                MAX_CODE_GENERATION_ATTEMPTS
            )));
        }

        let name_length = self.limits.max_guest_name_length;
        if name_length == 0 || name_length > DEFAULT_MAX_GUEST_NAME_LENGTH {
            return Err(ConfigValidationError::InvalidValue(format!(
                "max_guest_name_length must be between 1 and {}",
                DEFAULT_MAX_GUEST_NAME_LENGTH
            )));
        }

        Ok(())
    }

    /// Pool settings for the persistence layer.
    pub fn pool_config(&self) -> persistence::DatabaseConfig {
        persistence::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_guest_name_length: self.limits.max_guest_name_length,
            code_generation_attempts: self.invitations.code_generation_attempts,
        }
    }
}
