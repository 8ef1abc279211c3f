//! Data directory layout and file output helpers.

use std::path::{Path, PathBuf};

use chatscope_types::config::DashboardConfig;

pub const DATA_DIR_ENV: &str = "CHATSCOPE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATSCOPE_DATA_DIR` environment variable
/// 2. `~/.chatscope`
/// 3. `.chatscope` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatscope");
    }

    PathBuf::from(".chatscope")
}

/// Path of the SQLite database named by `config`, relative to `data_dir`
/// unless the configured name is absolute.
pub fn database_path(data_dir: &Path, config: &DashboardConfig) -> PathBuf {
    data_dir.join(&config.database_file)
}

/// Write `content` to `path`, creating parent directories as needed.
pub async fn write_file(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}
