use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use serde::Deserialize;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Copy the scene to `<scene>.bak` before overwriting it.
    pub backup: bool,
    /// Avatar to use when a scene holds several and none is named.
    pub avatar: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup: true,
            avatar: None,
        }
    }
}

pub fn init(config: Config) {
    CONFIG.set(config).ok();
}

fn get() -> Option<&'static Config> {
    CONFIG.get()
}

pub fn backup() -> bool {
    get().is_none_or(|c| c.backup)
}

pub fn default_avatar() -> Option<&'static str> {
    get().and_then(|c| c.avatar.as_deref())
}

/// `$XDG_CONFIG_HOME/rekey/config.toml`, else `~/.config/rekey/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("rekey").join("config.toml"))
}

/// Load the config at `path`, or at [`default_path`] when none is given.
/// A missing default file yields the defaults; an explicit path must exist.
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
