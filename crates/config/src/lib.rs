pub mod schema;

pub use schema::{MonitorConfig, SamplingConfig, ThemeConfig, WindowConfig};

use graphmon_core::{MonError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()` if
/// the file doesn't exist so the overlay always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| MonError::Config(format!("TOML parse error: {e}")))
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save(config: &MonitorConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let raw = toml::to_string_pretty(config)
        .map_err(|e| MonError::Config(format!("serialize error: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, raw)?;

    tracing::debug!("Config saved to '{}'", path.display());
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("graphmon").join("graphmon.toml")
}
