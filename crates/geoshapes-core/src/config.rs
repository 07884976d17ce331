use crate::error::{GeoshapesError, Result};
use crate::validation::{ForeignMembers, ValidationOptions, ValidityMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable selecting the foreign member policy
pub const FOREIGN_MEMBERS_ENV: &str = "GEOSHAPES_FOREIGN_MEMBERS";

/// Environment variable selecting the MultiPolygon validity mode
pub const MULTIPOLYGON_VALIDITY_ENV: &str = "GEOSHAPES_MULTIPOLYGON_VALIDITY";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set explicitly by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered validation configuration
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub foreign_members: ConfigValue<ForeignMembers>,
    pub multipolygon_validity: ConfigValue<ValidityMode>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = ValidationOptions::default();
        Self {
            foreign_members: ConfigValue::new(defaults.foreign_members, ConfigSource::Default),
            multipolygon_validity: ConfigValue::new(
                defaults.multipolygon_validity,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoshapesError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoshapesError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(foreign_members) = file_config.foreign_members {
            self.foreign_members.update(foreign_members, ConfigSource::File);
        }

        if let Some(multipolygon_validity) = file_config.multipolygon_validity {
            self.multipolygon_validity.update(multipolygon_validity, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    ///
    /// Unparsable values are logged and ignored.
    pub fn load_from_env(mut self) -> Self {
        if let Ok(policy_str) = env::var(FOREIGN_MEMBERS_ENV) {
            match parse_foreign_members(&policy_str) {
                Ok(policy) => self.foreign_members.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid {} value '{}': expected ignore or reject",
                    FOREIGN_MEMBERS_ENV,
                    policy_str
                ),
            }
        }

        if let Ok(validity_str) = env::var(MULTIPOLYGON_VALIDITY_ENV) {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => {
                    self.multipolygon_validity.update(validity, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid {} value '{}': expected strict or lenient",
                    MULTIPOLYGON_VALIDITY_ENV,
                    validity_str
                ),
            }
        }

        self
    }

    /// Apply values set explicitly by the embedding application
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(foreign_members) = overrides.foreign_members {
            self.foreign_members.update(foreign_members, ConfigSource::Override);
        }

        if let Some(multipolygon_validity) = overrides.multipolygon_validity {
            self.multipolygon_validity.update(multipolygon_validity, ConfigSource::Override);
        }
    }

    /// The options the validators run with
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            foreign_members: self.foreign_members.value,
            multipolygon_validity: self.multipolygon_validity.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "foreign_members".to_string(),
            (format!("{:?}", self.foreign_members.value), self.foreign_members.source),
        );

        map.insert(
            "multipolygon_validity".to_string(),
            (format!("{:?}", self.multipolygon_validity.value), self.multipolygon_validity.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    foreign_members: Option<ForeignMembers>,
    multipolygon_validity: Option<ValidityMode>,
}

/// Explicit configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub foreign_members: Option<ForeignMembers>,
    pub multipolygon_validity: Option<ValidityMode>,
}

/// Parse foreign member policy from string
pub fn parse_foreign_members(s: &str) -> Result<ForeignMembers> {
    match s.to_lowercase().as_str() {
        "ignore" => Ok(ForeignMembers::Ignore),
        "reject" => Ok(ForeignMembers::Reject),
        _ => Err(GeoshapesError::ConfigInvalid {
            key: "foreign_members".to_string(),
            reason: format!("Invalid foreign member policy: {}. Use ignore or reject", s),
        }),
    }
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(GeoshapesError::ConfigInvalid {
            key: "multipolygon_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}
