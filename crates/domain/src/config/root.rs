use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::database::DatabaseConfig;
use super::errors::ConfigError;
use super::leaderboard::LeaderboardConfig;
use super::logging::LoggingConfig;
use super::retention::RetentionConfig;
use crate::category::RankField;

const LOCAL_CONFIG_PATH: &str = "gridrank.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/gridrank/config.toml";

/// Main configuration structure for gridrank
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Ranked view sizing and category ordering rules
    pub leaderboard: LeaderboardConfig,

    /// Rank list cache configuration
    pub cache: CacheConfig,

    /// Zombie purge, table caps and the daily schedule
    pub retention: RetentionConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. gridrank.toml in current directory
    /// 3. /etc/gridrank/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard.top_n == 0 {
            return Err(ConfigError::invalid("leaderboard", "top_n must be greater than 0"));
        }

        for rule in &self.leaderboard.categories {
            if rule.secondary.is_some_and(|s| s.field == RankField::Score) {
                return Err(ConfigError::invalid(
                    "leaderboard",
                    format!(
                        "game type {} declares score as its secondary ranking field",
                        rule.game_type
                    ),
                ));
            }
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::invalid("cache", "ttl_secs must be greater than 0"));
        }

        if self.cache.max_entries == 0 {
            return Err(ConfigError::invalid("cache", "max_entries must be greater than 0"));
        }

        if self.retention.schedule_time().is_none() {
            return Err(ConfigError::invalid(
                "retention",
                format!("schedule_time '{}' is not HH:MM", self.retention.schedule_time),
            ));
        }

        if self.retention.inactivity_days == 0 {
            return Err(ConfigError::invalid(
                "retention",
                "inactivity_days must be greater than 0",
            ));
        }

        if self.retention.history_size == 0 {
            return Err(ConfigError::invalid(
                "retention",
                "history_size must be greater than 0",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database",
                "max_connections must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Malformed(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, toml_string).map_err(|e| ConfigError::Unwritable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}
