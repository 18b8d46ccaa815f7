//! Application configuration
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `config/innkeep.toml`, then `INNKEEP__SECTION__KEY` environment
//! variables (for example `INNKEEP__SERVER__BIND=0.0.0.0:8080`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use innkeep_core::logging_facility::Profile;
use innkeep_core::HotelSettings;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "config/innkeep.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub payroll: HotelSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".innkeep/innkeep.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            profile: "development".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Unknown names fall back to development output
    pub fn profile(&self) -> Profile {
        self.profile.parse().unwrap_or(Profile::Development)
    }
}

impl AppConfig {
    /// Load from `file` (or the default location when it exists) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or a value has
    /// the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };
        builder
            .add_source(
                Environment::with_prefix("INNKEEP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.database.path, PathBuf::from(".innkeep/innkeep.db"));
        assert_eq!(config.logging.profile(), Profile::Development);
        assert_eq!(config.payroll.withholding_bp, 1_500);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("innkeep.toml");
        std::fs::write(
            &path,
            "[server]\nbind = \"0.0.0.0:9000\"\n\n[payroll]\nwithholding_bp = 2000\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.payroll.withholding_bp, 2_000);
        assert_eq!(config.payroll.standard_day_minutes, 480);
        assert_eq!(config.database.path, PathBuf::from(".innkeep/innkeep.db"));
    }

    #[test]
    fn test_unknown_profile_falls_back() {
        let logging = LoggingConfig {
            profile: "verbose".to_string(),
        };
        assert_eq!(logging.profile(), Profile::Development);
    }
}
