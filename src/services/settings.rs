//! Persisted dashboard settings
//!
//! Theme preference and the Gemini API key live in a single JSON file with
//! an explicit load/save boundary; nothing else in the app touches disk.

use crate::types::{LeadtrackError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no API key is stored
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Terminal theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Persisted settings (`~/.leadtrack/settings.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Settings {
    /// Default settings path (~/.leadtrack/settings.json)
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| LeadtrackError::Settings("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".leadtrack").join("settings.json"))
    }

    /// Load settings, falling back to defaults on a missing or unreadable
    /// file (first run has no settings file)
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path).unwrap_or_else(|e| {
                if path.exists() {
                    eprintln!("[leadtrack] Warning: settings ignored: {}", e);
                }
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LeadtrackError::Settings(format!("Invalid settings format: {}", e)))
    }

    /// Save settings to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Save settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LeadtrackError::Settings(format!("Serialization failed: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Stored API key, or the `GEMINI_API_KEY` environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemePreference::Auto);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_settings_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            theme: ThemePreference::Dark,
            api_key: Some("test-key".into()),
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_settings_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        Settings::default().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("settings error"));
    }

    #[test]
    fn test_theme_preference_serde_lowercase() {
        let settings = Settings {
            theme: ThemePreference::Light,
            api_key: None,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"light\""));

        let parsed: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(parsed.theme, ThemePreference::Dark);
    }

    #[test]
    fn test_settings_missing_fields_default() {
        let parsed: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_resolve_api_key_prefers_stored_key() {
        let settings = Settings {
            theme: ThemePreference::Auto,
            api_key: Some("stored".into()),
        };
        assert_eq!(settings.resolve_api_key().as_deref(), Some("stored"));
    }

    #[test]
    fn test_resolve_api_key_ignores_blank_stored_key() {
        let settings = Settings {
            theme: ThemePreference::Auto,
            api_key: Some("   ".into()),
        };
        // Falls through to the environment; absent there means None
        let resolved = settings.resolve_api_key();
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(resolved.is_none());
        }
    }
}
