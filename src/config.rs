//! Generator configuration
//!
//! Settings can come from a YAML file and be overridden from the command
//! line. Every field has a default, so an empty file is a valid config.

use crate::error::{Error, Result};
use crate::types::{TimestampStyle, DEFAULT_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of events to generate
    #[serde(default = "default_count")]
    pub count: usize,

    /// Local file the events are written to
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Optional object storage destination for the finished file
    #[serde(default)]
    pub upload: Option<String>,

    /// Upload under a `dt=YYYY-MM-DD/` prefix
    #[serde(default)]
    pub partition_by_date: bool,

    /// Seed for a reproducible random source
    #[serde(default)]
    pub seed: Option<u64>,

    /// Timestamp rendering
    #[serde(default)]
    pub timestamp_style: TimestampStyle,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

fn default_output() -> PathBuf {
    PathBuf::from("user_activity_logs.json")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            output: default_output(),
            upload: None,
            partition_by_date: false,
            seed: None,
            timestamp_style: TimestampStyle::default(),
        }
    }
}

/// Command-line overrides applied on top of a loaded config
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub count: Option<usize>,
    pub output: Option<PathBuf>,
    pub upload: Option<String>,
    pub partition_by_date: bool,
    pub seed: Option<u64>,
    pub timestamp_style: Option<TimestampStyle>,
}

impl GeneratorConfig {
    /// Parse a config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(count) = overrides.count {
            self.count = count;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(upload) = overrides.upload {
            self.upload = Some(upload);
        }
        if overrides.partition_by_date {
            self.partition_by_date = true;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(style) = overrides.timestamp_style {
            self.timestamp_style = style;
        }
        self
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidCount { count: self.count });
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::invalid_value("output", "path must not be empty"));
        }
        if let Some(upload) = &self.upload {
            if upload.trim().is_empty() {
                return Err(Error::invalid_value("upload", "destination must not be empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.count, 1000);
        assert_eq!(config.output, PathBuf::from("user_activity_logs.json"));
        assert_eq!(config.timestamp_style, TimestampStyle::Naive);
        assert!(config.upload.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(GeneratorConfig::from_yaml("").unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
count: 250
output: /tmp/raw/events.json
upload: s3://demo-bucket/raw/
partition_by_date: true
seed: 42
timestamp_style: utc
";
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.count, 250);
        assert_eq!(config.output, PathBuf::from("/tmp/raw/events.json"));
        assert_eq!(config.upload.as_deref(), Some("s3://demo-bucket/raw/"));
        assert!(config.partition_by_date);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.timestamp_style, TimestampStyle::Utc);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GeneratorConfig::from_yaml("records: 10").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(GeneratorConfig::from_yaml("count: -5").is_err());
    }

    #[test]
    fn test_zero_count_invalid() {
        let config = GeneratorConfig::from_yaml("count: 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidCount { count: 0 }));
    }

    #[test]
    fn test_overrides_win() {
        let config = GeneratorConfig::from_yaml("count: 10\nseed: 1").unwrap();
        let config = config.with_overrides(ConfigOverrides {
            count: Some(3),
            seed: Some(9),
            timestamp_style: Some(TimestampStyle::Utc),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.count, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.timestamp_style, TimestampStyle::Utc);
        assert_eq!(config.output, PathBuf::from("user_activity_logs.json"));
    }

    #[test]
    fn test_empty_output_invalid() {
        let config = GeneratorConfig {
            output: PathBuf::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfigValue { .. }
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = GeneratorConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.is_config());
    }
}
