//! Application configuration management.
//!
//! Configuration is stored at `~/.config/carebook/config.json`. Selected
//! keys can be overridden from the environment (or a `.env` file loaded by
//! the binary):
//!
//! - `CAREBOOK_LANG`: interface language code
//! - `CAREBOOK_CATALOG`: path of a catalog JSON file
//! - `CAREBOOK_BANK_URL`: base URL of the bank lookup service
//! - `CAREBOOK_TEST_MODE`: `1`/`true` disables all step checks

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::i18n::Language;
use crate::validation::ValidationPolicy;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "carebook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the data directory for exported bookings
const EXPORT_DIR: &str = "bookings";

pub const ENV_LANG: &str = "CAREBOOK_LANG";
pub const ENV_CATALOG: &str = "CAREBOOK_CATALOG";
pub const ENV_BANK_URL: &str = "CAREBOOK_BANK_URL";
pub const ENV_TEST_MODE: &str = "CAREBOOK_TEST_MODE";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub catalog_path: Option<PathBuf>,
    pub bank_lookup_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub skip_child_step: bool,
    pub test_mode: bool,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Persist `language` in the config file.
    ///
    /// The file is re-read so that environment overrides applied to the
    /// running config are never written back.
    pub fn save_language(language: Language) -> Result<()> {
        Self::save_language_to(&Self::config_path()?, language)
    }

    pub fn save_language_to(path: &Path, language: Language) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.language = language;
        stored.save_to(path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(code) = lookup(ENV_LANG) {
            match Language::from_code(&code) {
                Some(language) => self.language = language,
                None => warn!(value = %code, "Ignoring unsupported {}", ENV_LANG),
            }
        }
        if let Some(path) = lookup(ENV_CATALOG).filter(|v| !v.trim().is_empty()) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(ENV_BANK_URL).filter(|v| !v.trim().is_empty()) {
            self.bank_lookup_url = Some(url);
        }
        if let Some(flag) = lookup(ENV_TEST_MODE) {
            self.test_mode = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    pub fn bank_lookup_url(&self) -> &str {
        self.bank_lookup_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            skip_child_step: self.skip_child_step,
            test_mode: self.test_mode,
        }
    }

    /// Directory for the log file.
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Where exported bookings are written.
    pub fn export_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.export_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(EXPORT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.language, Language::German);
        assert_eq!(config.bank_lookup_url(), "https://openiban.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.validation_policy(), ValidationPolicy::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"language": "en", "request_timeout_secs": 5}"#).unwrap();
        assert_eq!(config.language, Language::English);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(!config.test_mode);
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = Config {
            language: Language::English,
            skip_child_step: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_language_keeps_overrides_out_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::default().save_to(&path).unwrap();

        let running = Config::load_from(&path).unwrap().with_overrides(env(&[
            (ENV_TEST_MODE, "1"),
            (ENV_BANK_URL, "http://localhost:8080"),
        ]));
        assert!(running.test_mode);

        Config::save_language_to(&path, Language::English).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.language, Language::English);
        assert!(!reloaded.test_mode);
        assert_eq!(reloaded.bank_lookup_url, None);
    }

    #[test]
    fn test_save_language_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new").join(CONFIG_FILE);
        Config::save_language_to(&path, Language::English).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap(),
            Config { language: Language::English, ..Config::default() }
        );
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(env(&[
            (ENV_LANG, "en"),
            (ENV_CATALOG, "/tmp/catalog.json"),
            (ENV_BANK_URL, "http://localhost:8080"),
            (ENV_TEST_MODE, "true"),
        ]));
        assert_eq!(config.language, Language::English);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(config.bank_lookup_url(), "http://localhost:8080");
        assert!(config.validation_policy().test_mode);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let base = Config {
            language: Language::English,
            ..Config::default()
        };
        let config = base.clone().with_overrides(env(&[(ENV_LANG, "xx"), (ENV_CATALOG, " "), (ENV_TEST_MODE, "0")]));
        assert_eq!(config, base);
    }

    #[test]
    fn test_explicit_export_dir() {
        let config = Config {
            export_dir: Some(PathBuf::from("/srv/bookings")),
            ..Config::default()
        };
        assert_eq!(config.export_dir().unwrap(), PathBuf::from("/srv/bookings"));
    }
}
