//! Dashboard configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.chatscope/` in
//! production) and deserializes it into [`DashboardConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatscope_types::config::DashboardConfig;

pub const CONFIG_FILE: &str = "config.toml";

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`DashboardConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(data_dir: &Path) -> DashboardConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return DashboardConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return DashboardConfig::default();
        }
    };

    match toml::from_str::<DashboardConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            DashboardConfig::default()
        }
    }
}
