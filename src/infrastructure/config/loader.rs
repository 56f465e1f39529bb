use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_questions_per_test: {0}. Must be at least 1")]
    InvalidQuestionLimit(usize),

    #[error("Invalid sweep_interval_secs: {0}. Must be positive")]
    InvalidSweepInterval(u64),

    #[error("Invalid idle_ttl_secs: {0}. Must be positive")]
    InvalidIdleTtl(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. proctor.yaml (project config)
    /// 3. Environment variables (`PROCTOR_*` prefix, highest priority)
    ///
    /// # Errors
    /// Returns error if extraction or validation fails.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("proctor.yaml"))
            .merge(Env::prefixed("PROCTOR_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    /// Returns error if the file is unreadable or validation fails.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    /// Returns the first constraint violation found.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.session.max_questions_per_test == 0 {
            return Err(ConfigError::InvalidQuestionLimit(
                config.session.max_questions_per_test,
            ));
        }

        if config.session.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidSweepInterval(
                config.session.sweep_interval_secs,
            ));
        }

        if config.session.idle_ttl_secs == 0 {
            return Err(ConfigError::InvalidIdleTtl(config.session.idle_ttl_secs));
        }

        Ok(())
    }
}
