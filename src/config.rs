use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    /// Endpoint prefix for the `latest` rate tables; the provider
    /// appends the lowercased base code.
    pub fn latest_endpoint(&self) -> String {
        format!(
            "{}/{}/latest",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

fn default_base_url() -> String {
    "https://v6.exchangerate-api.com/v6".to_string()
}

/// Selection preloaded when a session starts.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: default_from(),
            to: default_to(),
            amount: default_amount(),
        }
    }
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "EUR".to_string()
}

fn default_amount() -> f64 {
    1.0
}

fn default_debounce_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Delay before a typed amount triggers a conversion.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization_with_defaults() {
        let yaml_str = r#"
provider:
  api_key: "test-key"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.api_key, "test-key");
        assert_eq!(config.provider.base_url, "https://v6.exchangerate-api.com/v6");
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "EUR");
        assert_eq!(config.defaults.amount, 1.0);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_config_deserialization_full() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/v6"
  api_key: "abc123"

defaults:
  from: "GBP"
  to: "JPY"
  amount: 250.0

debounce_ms: 200
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/v6");
        assert_eq!(config.defaults.from, "GBP");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.defaults.amount, 250.0);
        assert_eq!(config.debounce_ms, 200);
    }

    #[test]
    fn test_latest_endpoint_composition() {
        let provider = ProviderConfig {
            base_url: "http://example.com/v6/".to_string(),
            api_key: "key".to_string(),
        };
        assert_eq!(provider.latest_endpoint(), "http://example.com/v6/key/latest");
    }
}
