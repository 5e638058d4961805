//! # Service Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COCONUT_DB_PATH=/var/lib/coconut/coconut.db                        │
//! │     COCONUT_UTC_OFFSET=-05:00                                          │
//! │     COCONUT_COMPOSITION=max                                            │
//! │     COCONUT_FALLBACK_OFFSET_DAYS=5                                     │
//! │     COCONUT_FALLBACK_FEE=15.00                                         │
//! │     COCONUT_LOG=info,coconut_db=debug                                  │
//! │                                                                         │
//! │  2. TOML Config File (coconut.toml)                                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "coconut.db"
//! max_connections = 5
//!
//! [delivery]
//! utc_offset = "-05:00"       # business local time, used for cutoffs
//! composition = "max"         # max | zone_only | quantity_only | sum
//! fallback_offset_days = 5    # optional
//! fallback_fee = "15.00"      # optional
//!
//! [logging]
//! filter = "info"
//! ```

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use coconut_core::{CompositionPolicy, Fallback, Money, MAX_OFFSET_DAYS};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "coconut.toml";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("coconut.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    /// Business local offset from UTC, `+HH:MM` / `-HH:MM`.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    #[serde(default)]
    pub composition: CompositionPolicy,

    /// Offset used when no quantity or zone rule matches.
    #[serde(default)]
    pub fallback_offset_days: Option<u32>,

    /// Fee used when the zone has no fee entry, as a decimal amount.
    #[serde(default)]
    pub fallback_fee: Option<String>,
}

fn default_utc_offset() -> String {
    // Miami, standard time
    "-05:00".to_string()
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            utc_offset: default_utc_offset(),
            composition: CompositionPolicy::default(),
            fallback_offset_days: None,
            fallback_fee: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,coconut=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub delivery: DeliverySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `coconut.toml` if present)
    /// 3. `COCONUT_*` environment variables
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            info!(?path, "Loading config from file");
            Self::from_toml(&std::fs::read_to_string(&path)?)?
        } else if config_path.is_some() {
            return Err(ConfigError::Invalid(format!(
                "config file not found: {}",
                path.display()
            )));
        } else {
            debug!(?path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.timezone()?;
        self.fallback()?;

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must not be empty".into()));
        }

        Ok(())
    }

    /// The business's local time zone.
    pub fn timezone(&self) -> ConfigResult<FixedOffset> {
        parse_utc_offset(&self.delivery.utc_offset)
    }

    /// Fallback values for unmatched lookups.
    pub fn fallback(&self) -> ConfigResult<Fallback> {
        let offset_days = match self.delivery.fallback_offset_days {
            Some(days) if days > MAX_OFFSET_DAYS => {
                return Err(ConfigError::Invalid(format!(
                    "delivery.fallback_offset_days must be at most {}",
                    MAX_OFFSET_DAYS
                )))
            }
            other => other,
        };

        let fee = match self.delivery.fallback_fee.as_deref() {
            None => None,
            Some(raw) => match Money::parse_decimal(raw) {
                Some(fee) if !fee.is_negative() => Some(fee),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "delivery.fallback_fee must be a non-negative amount, got '{}'",
                        raw
                    )))
                }
            },
        };

        Ok(Fallback { offset_days, fee })
    }

    /// Applies `COCONUT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Values that fail to parse are logged and ignored; the rest of the
    /// config is still validated afterwards.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("COCONUT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(offset) = lookup("COCONUT_UTC_OFFSET") {
            debug!(offset = %offset, "Overriding UTC offset from environment");
            self.delivery.utc_offset = offset;
        }

        if let Some(policy) = lookup("COCONUT_COMPOSITION") {
            match policy.parse::<CompositionPolicy>() {
                Ok(parsed) => self.delivery.composition = parsed,
                Err(e) => warn!(policy = %policy, "Ignoring COCONUT_COMPOSITION: {}", e),
            }
        }

        if let Some(days) = lookup("COCONUT_FALLBACK_OFFSET_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.delivery.fallback_offset_days = Some(d),
                Err(_) => warn!(days = %days, "Ignoring COCONUT_FALLBACK_OFFSET_DAYS"),
            }
        }

        if let Some(fee) = lookup("COCONUT_FALLBACK_FEE") {
            self.delivery.fallback_fee = Some(fee);
        }

        if let Some(filter) = lookup("COCONUT_LOG") {
            self.logging.filter = filter;
        }
    }
}

/// Parses `+HH:MM`, `-HH:MM` or `Z`.
pub fn parse_utc_offset(input: &str) -> ConfigResult<FixedOffset> {
    let invalid = || {
        ConfigError::Invalid(format!(
            "delivery.utc_offset must look like -05:00, got '{}'",
            input
        ))
    };

    let s = input.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delivery.composition, CompositionPolicy::Max);
        assert_eq!(
            config.timezone().unwrap(),
            FixedOffset::west_opt(5 * 3600).unwrap()
        );
        assert_eq!(config.fallback().unwrap(), Fallback::default());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_utc_offset("-05:00").unwrap().local_minus_utc(), -18_000);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);

        assert!(parse_utc_offset("05:00").is_err());
        assert!(parse_utc_offset("-5").is_err());
        assert!(parse_utc_offset("+24:00").is_err());
        assert!(parse_utc_offset("America/New_York").is_err());
    }

    #[test]
    fn test_from_toml_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            [delivery]
            composition = "sum"
            fallback_fee = "15.00"
            "#,
        )
        .unwrap();

        assert_eq!(config.delivery.composition, CompositionPolicy::Sum);
        assert_eq!(config.delivery.utc_offset, "-05:00");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.fallback().unwrap().fee, Some(Money::from_cents(1500)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("COCONUT_DB_PATH", "/tmp/c.db"),
            ("COCONUT_UTC_OFFSET", "+01:00"),
            ("COCONUT_COMPOSITION", "zone_only"),
            ("COCONUT_FALLBACK_OFFSET_DAYS", "4"),
            ("COCONUT_LOG", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/tmp/c.db"));
        assert_eq!(config.timezone().unwrap().local_minus_utc(), 3600);
        assert_eq!(config.delivery.composition, CompositionPolicy::ZoneOnly);
        assert_eq!(config.fallback().unwrap().offset_days, Some(4));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|k| match k {
            "COCONUT_COMPOSITION" => Some("average".to_string()),
            "COCONUT_FALLBACK_OFFSET_DAYS" => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config.delivery.composition, CompositionPolicy::Max);
        assert_eq!(config.delivery.fallback_offset_days, None);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.delivery.fallback_fee = Some("-1.00".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.delivery.fallback_offset_days = Some(MAX_OFFSET_DAYS + 1);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.delivery.utc_offset = "EST".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/coconut.toml")));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = AppConfig::default();
        config.delivery.fallback_offset_days = Some(3);

        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }
}
