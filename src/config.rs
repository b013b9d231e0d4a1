//! Configuration for the file-backed wizard session.
//!
//! Settings can be saved to and loaded from a JSON file; the storage
//! directory can also be overridden through `SIGNUP_WIZARD_DIR`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::persistence::{EntryKeys, FileStore, KeyValueAdapter, FORM_DATA_KEY, STEP_KEY};

/// Environment variable overriding [`WizardConfig::storage_dir`]
pub const STORAGE_DIR_ENV: &str = "SIGNUP_WIZARD_DIR";

/// Where and under which keys the wizard snapshot is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Directory holding one file per snapshot entry
    pub storage_dir: PathBuf,
    /// Key (file name) of the form-data entry
    pub form_data_key: String,
    /// Key (file name) of the current-step entry
    pub step_key: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".signup-wizard"),
            form_data_key: FORM_DATA_KEY.to_string(),
            step_key: STEP_KEY.to_string(),
        }
    }
}

impl WizardConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Apply overrides from the environment
    pub fn apply_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV).filter(|d| !d.is_empty()) {
            self.storage_dir = PathBuf::from(dir);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage_dir.as_os_str().is_empty() {
            anyhow::bail!("Storage directory must be specified");
        }

        for (name, key) in [("form data key", &self.form_data_key), ("step key", &self.step_key)] {
            if key.trim().is_empty() {
                anyhow::bail!("The {} must not be empty", name);
            }
            // Keys double as file names inside the storage directory
            if key.starts_with('.')
                || !key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            {
                anyhow::bail!(
                    "The {} '{}' may only contain letters, digits, '_', '-', '.' and must not start with '.'",
                    name,
                    key
                );
            }
        }

        if self.form_data_key == self.step_key {
            anyhow::bail!("Form data key and step key must differ");
        }

        Ok(())
    }

    pub fn entry_keys(&self) -> EntryKeys {
        EntryKeys {
            form_data: self.form_data_key.clone(),
            step: self.step_key.clone(),
        }
    }

    /// Build the file-backed adapter described by this configuration
    pub fn file_adapter(&self) -> KeyValueAdapter<FileStore> {
        KeyValueAdapter::with_keys(FileStore::new(&self.storage_dir), self.entry_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WizardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.form_data_key, "signupFormData");
        assert_eq!(config.step_key, "signupStep");
    }

    #[test]
    fn test_rejects_empty_and_duplicate_keys() {
        let config = WizardConfig {
            step_key: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WizardConfig {
            step_key: FORM_DATA_KEY.to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_keys_that_escape_the_directory() {
        for key in ["../step", "a/b", ".hidden"] {
            let config = WizardConfig {
                step_key: key.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{:?} should be rejected", key);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WizardConfig = serde_json::from_str(r#"{"step_key":"currentStep"}"#).unwrap();
        assert_eq!(config.step_key, "currentStep");
        assert_eq!(config.form_data_key, FORM_DATA_KEY);
    }

    #[test]
    fn test_entry_keys_follow_config() {
        let config = WizardConfig {
            form_data_key: "formData".to_string(),
            ..Default::default()
        };
        let keys = config.entry_keys();
        assert_eq!(keys.form_data, "formData");
        assert_eq!(keys.step, STEP_KEY);
        assert_eq!(config.file_adapter().keys(), &keys);
    }
}
