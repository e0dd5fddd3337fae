//! Configuration types for zip-rename-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Delivery behavior configuration (where files go and how fast)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Output directory for delivered files (default: "./downloads")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fixed wait after each delivered entry (default: 1000 ms)
    ///
    /// The pause flag is only looked at once this wait has elapsed, so a
    /// pause requested mid-step takes effect before the next entry starts.
    #[serde(default = "default_step_delay", with = "duration_ms_serde")]
    pub step_delay: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            step_delay: default_step_delay(),
        }
    }
}

/// List-editing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Suffix appended to the display name of a duplicated entry (default: " (copy)")
    #[serde(default = "default_duplicate_suffix")]
    pub duplicate_suffix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duplicate_suffix: default_duplicate_suffix(),
        }
    }
}

/// Main configuration for zip-rename-dl
///
/// Sub-config fields are flattened, so the JSON form is a single flat object:
///
/// ```json
/// { "output_dir": "out", "step_delay": 250, "duplicate_suffix": " (copy)" }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Delivery settings (output directory, step delay)
    #[serde(flatten)]
    pub delivery: DeliveryConfig,

    /// List-editing settings
    #[serde(flatten)]
    pub session: SessionConfig,

    /// Capacity of the event broadcast channel (default: 256)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delivery: DeliveryConfig::default(),
            session: SessionConfig::default(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.delivery.output_dir
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| Error::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        Self::from_json(&raw)
    }

    /// Reject settings the driver cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(Error::Config {
                message: "event_capacity must be greater than zero".to_string(),
                key: Some("event_capacity".to_string()),
            });
        }
        if self.delivery.output_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "output_dir must not be empty".to_string(),
                key: Some("output_dir".to_string()),
            });
        }
        Ok(())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_step_delay() -> Duration {
    Duration::from_millis(1000)
}

fn default_duplicate_suffix() -> String {
    " (copy)".to_string()
}

fn default_event_capacity() -> usize {
    256
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.output_dir(), &PathBuf::from("./downloads"));
        assert_eq!(config.delivery.step_delay, Duration::from_secs(1));
        assert_eq!(config.session.duplicate_suffix, " (copy)");
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn empty_json_object_yields_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.delivery.step_delay, Duration::from_millis(1000));
        assert_eq!(config.session.duplicate_suffix, " (copy)");
    }

    #[test]
    fn flat_json_overrides_nested_fields() {
        let config = Config::from_json(
            r#"{ "output_dir": "out", "step_delay": 250, "duplicate_suffix": "-dup" }"#,
        )
        .unwrap();
        assert_eq!(config.output_dir(), &PathBuf::from("out"));
        assert_eq!(config.delivery.step_delay, Duration::from_millis(250));
        assert_eq!(config.session.duplicate_suffix, "-dup");
    }

    #[test]
    fn step_delay_serializes_as_millis() {
        let mut config = Config::default();
        config.delivery.step_delay = Duration::from_millis(1500);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["step_delay"], 1500);
    }

    #[test]
    fn zero_event_capacity_is_rejected() {
        let result = Config::from_json(r#"{ "event_capacity": 0 }"#);
        match result {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("event_capacity")),
            other => panic!("expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let result = Config::from_json("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn missing_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_json_file(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(Error::Config { key: None, .. })));
    }
}
