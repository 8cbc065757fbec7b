//! Configuration handling for form messages

use crate::error::FormResult;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Message used when a required field is empty and no override is set
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Value required";

/// Message used when a rule fails without providing its own message
pub const DEFAULT_INVALID_MESSAGE: &str = "Value not valid";

/// Generic validation messages shared by every field of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Message for a failed required check
    pub required_message: String,
    /// Message for a failed rule that returned no message
    pub invalid_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            invalid_message: DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "centy", "reactive-forms")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, falling back to defaults
    pub fn load() -> FormResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                let config = Self::from_json_str(&content)?;
                tracing::debug!("Loaded form config from {}", path.display());
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> FormResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> FormResult<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert_eq!(config.required_message, "Value required");
        assert_eq!(config.invalid_message, "Value not valid");
    }

    #[test]
    fn test_serialization() {
        let config = FormConfig {
            required_message: "Fill this in".to_string(),
            invalid_message: "Nope".to_string(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed = FormConfig::from_json_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let parsed = FormConfig::from_json_str(r#"{"required_message": "Needed"}"#).unwrap();
        assert_eq!(parsed.required_message, "Needed");
        assert_eq!(parsed.invalid_message, DEFAULT_INVALID_MESSAGE);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed = FormConfig::from_json_str("{}").unwrap();
        assert_eq!(parsed, FormConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"invalid_message": "Bad", "unknown_field": "value"}"#;
        let parsed = FormConfig::from_json_str(json).unwrap();
        assert_eq!(parsed.invalid_message, "Bad");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = FormConfig::from_json_str("not json");
        assert!(matches!(result, Err(crate::FormError::Json(_))));
    }

    #[test]
    fn test_load_returns_ok() {
        // Either the user's file or the defaults
        let result = FormConfig::load();
        assert!(result.is_ok());
    }
}
