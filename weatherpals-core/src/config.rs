use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{provider::ProviderId, request::DEFAULT_HORIZON_DAYS};

/// Configuration for a single provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the provider's endpoint root, e.g. a local mirror.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional default provider id, "openmeteo" or "weatherapi".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Furthest day ahead an analysis may target.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    /// Example TOML:
    /// [providers.weatherapi]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// The default provider, falling back to keyless Open-Meteo.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s).context(
                "Invalid default provider in configuration.\n\
                 Hint: run `weatherpals configure <provider>` to pick a supported one.",
            ),
            None => Ok(ProviderId::OpenMeteo),
        }
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherpals", "weatherpals")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key; the first configured provider becomes the default.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.entry(provider_id.as_str().to_string()).or_default().api_key =
            Some(api_key);

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).and_then(|cfg| cfg.api_key.as_deref())
    }

    pub fn provider_base_url(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_falls_back_to_open_meteo() {
        let cfg = Config::default();
        assert_eq!(cfg.default_provider_id().expect("fallback"), ProviderId::OpenMeteo);
        assert_eq!(cfg.horizon_days, 15);
    }

    #[test]
    fn invalid_default_provider_is_reported() {
        let cfg = Config { default_provider: Some("openweather".into()), ..Config::default() };
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("Invalid default provider"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WEATHER_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::WeatherApi);

        let key = cfg.provider_api_key(ProviderId::WeatherApi);
        assert_eq!(key, Some("WEATHER_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::WeatherApi));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.set_default_provider(ProviderId::OpenMeteo);
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WEATHER_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::OpenMeteo);
    }

    #[test]
    fn upsert_keeps_base_url_override() {
        let mut cfg = Config::default();
        cfg.providers.insert(
            "weatherapi".into(),
            ProviderConfig { api_key: None, base_url: Some("http://localhost:8080".into()) },
        );

        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "KEY".into());

        assert_eq!(cfg.provider_base_url(ProviderId::WeatherApi), Some("http://localhost:8080"));
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), Some("KEY"));
    }

    #[test]
    fn open_meteo_counts_as_configured_without_key() {
        let cfg = Config::default();
        assert!(cfg.is_provider_configured(ProviderId::OpenMeteo));
        assert!(!cfg.is_provider_configured(ProviderId::WeatherApi));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config { horizon_days: 7, ..Config::default() };
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "KEY".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.horizon_days, 7);
        assert_eq!(loaded.default_provider_id().expect("default"), ProviderId::WeatherApi);
        assert_eq!(loaded.provider_api_key(ProviderId::WeatherApi), Some("KEY"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");

        assert!(cfg.providers.is_empty());
        assert_eq!(cfg.horizon_days, 15);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_provider = \"openmeteo\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.horizon_days, 15);
        assert!(cfg.providers.is_empty());
    }
}
