use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// Publishable anon key. Row access is still gated per-user by the
    /// server's own policies.
    pub anon_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding uploaded poster images.
    #[serde(default = "default_poster_bucket")]
    pub poster_bucket: String,
}

fn default_poster_bucket() -> String {
    "posters".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            poster_bucket: default_poster_bucket(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("watchlog")
            .join("config.toml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.url.is_empty() || self.backend.url == "YOUR_PROJECT_URL" {
            anyhow::bail!("backend url is not configured");
        }
        if self.backend.anon_key.is_empty() || self.backend.anon_key == "YOUR_ANON_KEY" {
            anyhow::bail!("backend anon_key is not configured");
        }
        Ok(())
    }
}
