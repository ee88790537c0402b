//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `respira-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads and validates the file. Every field has a default, so
//! an empty file (or no file at all) yields a working session. Environment
//! overrides are a separate step ([`EngagementConfig::with_env_overrides`])
//! so parsing never depends on the process environment.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use respira_types::MissionId;

/// Environment variable overriding `calculator.base_url`.
pub const CALCULATOR_URL_ENV: &str = "RESPIRA_CALCULATOR_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngagementConfig {
    /// Initial store state.
    #[serde(default)]
    pub store: StoreConfig,

    /// Calculation service client settings.
    #[serde(default)]
    pub calculator: CalculatorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngagementConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, then re-validate.
    ///
    /// `RESPIRA_CALCULATOR_URL` overrides `calculator.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override leaves a value out of
    /// range.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        let url = std::env::var(CALCULATOR_URL_ENV).ok();
        self.calculator.override_base_url(url.as_deref());
        self.validate()?;
        Ok(self)
    }

    /// Check ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        if self.calculator.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "calculator.base_url",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.calculator.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "calculator.timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

/// Initial engagement state for a new session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// XP granted when the session opens.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Mission already in progress when the session opens, if any.
    #[serde(default)]
    pub initial_mission: Option<InitialMission>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            initial_mission: None,
        }
    }
}

impl StoreConfig {
    /// Check ranges for the store section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a negative balance or a progress
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "store.initial_balance",
                reason: format!("must not be negative, got {}", self.initial_balance),
            });
        }
        if let Some(mission) = &self.initial_mission {
            if mission.progress < Decimal::ZERO || mission.progress > Decimal::ONE {
                return Err(ConfigError::Invalid {
                    field: "store.initial_mission.progress",
                    reason: format!("must lie in [0, 1], got {}", mission.progress),
                });
            }
        }
        Ok(())
    }
}

/// A mission to place in the active slot at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitialMission {
    /// Catalog key of the mission.
    pub mission_id: MissionId,
    /// Progress already made.
    #[serde(default)]
    pub progress: Decimal,
}

/// Calculation service client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalculatorConfig {
    /// Base URL of the calculation API (no trailing slash).
    #[serde(default = "default_calculator_url")]
    pub base_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_calculator_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CalculatorConfig {
    /// Replace `base_url` with `url` if it is present and non-blank.
    /// Returns whether the URL changed.
    pub fn override_base_url(&mut self, url: Option<&str>) -> bool {
        match url.map(str::trim) {
            Some(url) if !url.is_empty() && url != self.base_url => {
                url.clone_into(&mut self.base_url);
                true
            }
            _ => false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_initial_balance() -> Decimal {
    Decimal::new(1250, 0)
}

fn default_calculator_url() -> String {
    "http://localhost:8000".to_owned()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
