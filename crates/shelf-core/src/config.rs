//! User configuration and data directory resolution.
//!
//! The config file lives at `<config dir>/shelf/config.toml`:
//!
//! ```toml
//! output = "text"
//! data_dir = "/home/me/shelves"
//! default_catalog = "mine"
//! ```
//!
//! Every field is optional and a missing file is the same as an empty one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Env var naming a config file to use instead of the default location.
pub const CONFIG_ENV: &str = "SHELF_CONFIG";

/// Env var that overrides the configured data directory.
pub const DATA_DIR_ENV: &str = "SHELF_DIR";

/// Directory used when nothing else resolves.
pub const FALLBACK_DATA_DIR: &str = "SAV";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub default_catalog: Option<String>,
}

/// `SHELF_CONFIG` if set, otherwise `<config dir>/shelf/config.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("shelf/config.toml")))
}

/// Load the user config from [`user_config_path`].
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    load_config_from(&path)
}

/// Parse the config at `path`, or defaults if there is no file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Where catalogs are stored: `--dir`, then `SHELF_DIR`, then config
/// `data_dir`, then the platform data dir, then `./SAV`.
#[must_use]
pub fn resolve_data_dir(flag: Option<&Path>, config: &UserConfig) -> PathBuf {
    let env_dir = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    resolve_data_dir_inner(
        flag,
        env_dir.as_deref(),
        config,
        dirs::data_dir().map(|dir| dir.join("shelf")).as_deref(),
    )
}

fn resolve_data_dir_inner(
    flag: Option<&Path>,
    env_dir: Option<&Path>,
    config: &UserConfig,
    platform_default: Option<&Path>,
) -> PathBuf {
    flag.filter(non_empty)
        .or_else(|| env_dir.filter(non_empty))
        .or_else(|| config.data_dir.as_deref().filter(non_empty))
        .or(platform_default)
        .map_or_else(|| PathBuf::from(FALLBACK_DATA_DIR), Path::to_path_buf)
}

fn non_empty(path: &&Path) -> bool {
    !path.as_os_str().is_empty()
}
