//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;

pub const CONFIG_FILENAME: &str = "kamleads.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "KAMLEADS_CONFIG";

/// Load configuration from `$KAMLEADS_CONFIG`, or the nearest kamleads.toml
pub fn load_config() -> Result<Config> {
    let config_path = match env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => {
            let cwd = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;
            find_config_from(&cwd).ok_or(Error::ConfigNotFound)?
        }
    };
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), base_url = %config.api.base_url, "loaded config");
    Ok(config)
}

/// Write a configuration to disk
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

/// Nearest kamleads.toml in `start` or one of its ancestors
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// `${NAME}` or `${NAME:-fallback}`
static ENV_REFERENCE: OnceLock<Regex> = OnceLock::new();

/// Substitute environment references. Unset names take their fallback,
/// or the empty string when there is none.
fn interpolate_env_vars(content: &str) -> String {
    let pattern = ENV_REFERENCE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
            .expect("constant pattern is valid")
    });

    pattern
        .replace_all(content, |caps: &regex::Captures| {
            env::var(&caps[1])
                .ok()
                .or_else(|| caps.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# kamleads configuration

[api]
# Base URL of the lead management API (without the /api prefix)
base_url = "${KAM_API_URL:-http://127.0.0.1:5000}"

# [session]
# Where the access token and user id are kept between runs
# credentials_path = "./.kamleads/credentials.json"
"#
}
