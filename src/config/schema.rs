//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the REST API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL without the `/api` prefix, e.g. `http://127.0.0.1:5000`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the access token and user id between runs
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
}

fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("kamleads").join("credentials.json"))
        .unwrap_or_else(|| PathBuf::from(".kamleads-credentials.json"))
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
        }
    }
}
