//! Console configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the session controller and its display adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Capacity of the display command broadcast channel
    pub event_channel_capacity: usize,
    /// Prefix placed before the topic in the report title
    pub report_title_prefix: String,
    /// Maximum status lines retained in the session history
    pub status_history_limit: usize,
    /// Maximum length of a status line stored in history
    pub status_preview_length: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 256,
            report_title_prefix: "Report on: ".to_string(),
            status_history_limit: 50,
            status_preview_length: 200,
        }
    }
}

impl ConsoleConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display channel capacity.
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Set the report title prefix.
    pub fn report_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.report_title_prefix = prefix.into();
        self
    }

    /// Set maximum status history.
    pub fn status_history_limit(mut self, max: usize) -> Self {
        self.status_history_limit = max;
        self
    }

    /// Set status preview length.
    pub fn status_preview_length(mut self, max: usize) -> Self {
        self.status_preview_length = max;
        self
    }

    /// Title shown above the report for `topic`.
    pub fn report_title(&self, topic: &str) -> String {
        format!("{}{}", self.report_title_prefix, topic)
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "failed to read config '{}': {}",
                path.display(),
                error
            ))
        })?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::Config(
                "event_channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.status_preview_length < 4 {
            return Err(Error::Config(
                "status_preview_length must be at least 4".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConsoleConfig::new()
            .event_channel_capacity(16)
            .report_title_prefix("Findings: ")
            .status_history_limit(5)
            .status_preview_length(40);

        assert_eq!(config.event_channel_capacity, 16);
        assert_eq!(config.status_history_limit, 5);
        assert_eq!(config.status_preview_length, 40);
        assert_eq!(config.report_title("Tides"), "Findings: Tides");
    }

    #[test]
    fn test_default_title() {
        let config = ConsoleConfig::default();
        assert_eq!(config.report_title("Ocean currents"), "Report on: Ocean currents");
    }

    #[test]
    fn test_from_json_partial() {
        let config = ConsoleConfig::from_json(r#"{"status_history_limit": 3}"#).unwrap();
        assert_eq!(config.status_history_limit, 3);
        assert_eq!(config.event_channel_capacity, 256);
    }

    #[test]
    fn test_from_json_rejects_zero_capacity() {
        let err = ConsoleConfig::from_json(r#"{"event_channel_capacity": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConsoleConfig::load("/nonexistent/console.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
