//! Configuration: defaults, then an optional `sirme.toml`, then `SIRME_*`
//! environment variables. The loaded value is handed to whoever needs it.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::service::validation::ValidationRules;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub rules: ValidationRules,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub dim_zero_hours: bool,
    /// Width of each day column in the detailed sheet, in characters.
    pub day_column_width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "pretty" | "json"
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Falls back to `~/.sirme` when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            dim_zero_hours: true,
            day_column_width: 7.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("sirme.toml"),
            dirs::config_dir()
                .map(|d| d.join("sirme").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("SIRME_DATA_DIR") {
            self.paths.data_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("SIRME_EXPORT_DIR") {
            self.export.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("SIRME_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("SIRME_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("SIRME_MAX_DAILY_HOURS") {
            self.rules.max_daily_hours = val.parse()
                .context("Invalid SIRME_MAX_DAILY_HOURS")?;
        }
        if let Ok(val) = env::var("SIRME_MAX_WEEKLY_HOURS") {
            self.rules.max_weekly_hours = val.parse()
                .context("Invalid SIRME_MAX_WEEKLY_HOURS")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;
        let thresholds = [
            ("max_daily_hours", rules.max_daily_hours),
            ("max_weekly_hours", rules.max_weekly_hours),
            ("min_hours_per_entry", rules.min_hours_per_entry),
            ("max_hours_per_entry", rules.max_hours_per_entry),
        ];
        for (name, value) in thresholds {
            if !(value > 0.0) {
                return Err(anyhow!("{} must be greater than 0, got {}", name, value));
            }
        }
        if rules.min_hours_per_entry > rules.max_hours_per_entry {
            return Err(anyhow!(
                "min_hours_per_entry ({}) exceeds max_hours_per_entry ({})",
                rules.min_hours_per_entry,
                rules.max_hours_per_entry
            ));
        }
        if rules.max_daily_hours > rules.max_weekly_hours {
            return Err(anyhow!(
                "max_daily_hours ({}) exceeds max_weekly_hours ({})",
                rules.max_daily_hours,
                rules.max_weekly_hours
            ));
        }
        if !(self.export.day_column_width > 0.0 && self.export.day_column_width <= 255.0) {
            return Err(anyhow!(
                "export.day_column_width must be in (0, 255], got {}",
                self.export.day_column_width
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            warn!(format = %self.logging.format, "Unknown log format, using pretty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rules, ValidationRules::default());
        assert_eq!(config.logging.level, "warn");
        assert!(config.paths.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [rules]
            max_daily_hours = 12.0

            [export]
            output_dir = "reports"
            day_column_width = 9.5
            "#,
        )
        .unwrap();
        assert_eq!(config.rules.max_daily_hours, 12.0);
        assert_eq!(config.rules.max_weekly_hours, 168.0);
        assert_eq!(config.export.output_dir, PathBuf::from("reports"));
        assert!(config.export.dim_zero_hours);
        assert_eq!(config.export.day_column_width, 9.5);
    }

    #[test]
    fn test_env_override() {
        env::set_var("SIRME_MAX_WEEKLY_HOURS", "60");
        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        env::remove_var("SIRME_MAX_WEEKLY_HOURS");
        assert_eq!(config.rules.max_weekly_hours, 60.0);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.rules.min_hours_per_entry = 30.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rules.max_daily_hours = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rules.max_daily_hours = 200.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.day_column_width = 0.0;
        assert!(config.validate().is_err());
    }
}
