// ⚙️ Engine Configuration - JSON file, every field optional

use crate::cache::DEFAULT_TTL_HOURS;
use crate::error::{NumerologyError, Result};
use crate::systems::{YClassification, PYTHAGOREAN};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// System used when a caller names none
    #[serde(default = "default_system")]
    pub default_system: String,

    /// Cache time-to-live for profiles and compatibility results
    #[serde(default = "default_ttl_hours")]
    pub cache_ttl_hours: i64,

    /// Forces one Y policy on every system when set
    #[serde(default)]
    pub y_classification: Option<YClassification>,

    /// JSON array of extra system definitions
    #[serde(default)]
    pub systems_file: Option<PathBuf>,

    /// JSON interpretation overrides
    #[serde(default)]
    pub interpretations_file: Option<PathBuf>,
}

fn default_system() -> String {
    PYTHAGOREAN.to_string()
}

fn default_ttl_hours() -> i64 {
    DEFAULT_TTL_HOURS
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_system: default_system(),
            cache_ttl_hours: default_ttl_hours(),
            y_classification: None,
            systems_file: None,
            interpretations_file: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Relative data-file paths resolve against the
    /// config file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NumerologyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: EngineConfig = serde_json::from_str(&content)?;

        if let Some(dir) = path.parent() {
            config.systems_file = config.systems_file.map(|p| resolve(dir, p));
            config.interpretations_file = config.interpretations_file.map(|p| resolve(dir, p));
        }

        config.validate()?;
        Ok(config)
    }

    /// Cache TTL as a duration; zero, negative and out-of-range hours are rejected
    pub fn cache_ttl(&self) -> Result<Duration> {
        if self.cache_ttl_hours <= 0 {
            return Err(NumerologyError::Config(format!(
                "cacheTtlHours must be positive, got {}",
                self.cache_ttl_hours
            )));
        }
        Duration::try_hours(self.cache_ttl_hours).ok_or_else(|| {
            NumerologyError::Config(format!(
                "cacheTtlHours {} is out of range",
                self.cache_ttl_hours
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.cache_ttl()?;
        if self.default_system.trim().is_empty() {
            return Err(NumerologyError::Config(
                "defaultSystem must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve(dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        dir.join(path)
    }
}
