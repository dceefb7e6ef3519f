//! Configuration for msds-core
//!
//! Adapter endpoints, timeouts, the KOSHA service key and which source is
//! treated as primary when merging.

use crate::domain::SourceId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted by [`ServiceConfig::from_env`]
pub const KOSHA_API_KEY_ENV: &str = "KOSHA_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// System-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Source whose non-empty fields win during merge
    pub primary: SourceId,
    /// User-Agent header sent with every request
    pub user_agent: String,
    pub kosha: KoshaConfig,
    pub pubchem: PubChemConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            primary: SourceId::Kosha,
            user_agent: format!("msds-core/{}", env!("CARGO_PKG_VERSION")),
            kosha: KoshaConfig::default(),
            pubchem: PubChemConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// `<config dir>/msds/config.toml`, e.g. `~/.config/msds/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("msds").join("config.toml"))
    }

    /// Fill the KOSHA service key from `KOSHA_API_KEY` when none is set.
    pub fn from_env(mut self) -> Self {
        if !self.kosha.has_service_key() {
            if let Ok(key) = std::env::var(KOSHA_API_KEY_ENV) {
                self.kosha.service_key = Some(key);
            }
        }
        self
    }
}

/// KOSHA MSDS open API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KoshaConfig {
    pub base_url: String,
    /// Service key; absent or blank disables the adapter
    pub service_key: Option<String>,
    /// `numOfRows` sent with searches
    pub page_size: u32,
    pub search_timeout_secs: u64,
    pub detail_timeout_secs: u64,
}

impl Default for KoshaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://msds.kosha.or.kr/openapi/service/msdschem".to_string(),
            service_key: None,
            page_size: 10,
            search_timeout_secs: 10,
            detail_timeout_secs: 15,
        }
    }
}

impl KoshaConfig {
    pub fn has_service_key(&self) -> bool {
        self.service_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }
}

/// PubChem PUG REST / PUG View settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PubChemConfig {
    pub base_url: String,
    pub search_timeout_secs: u64,
    pub detail_timeout_secs: u64,
}

impl Default for PubChemConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pubchem.ncbi.nlm.nih.gov".to_string(),
            search_timeout_secs: 10,
            detail_timeout_secs: 30,
        }
    }
}

impl PubChemConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }
}
