use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::database::Database;

/// Returns the path to the 100builds database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/100builds/builds.db`
/// - **Linux**: `~/.local/share/100builds/builds.db`
/// - **Windows**: `%LOCALAPPDATA%\100builds\builds.db`
pub fn get_db_path(config: &DatabaseConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("100builds").join("builds.db"))
}

/// Initialize the database connection
pub fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<Arc<Database>> {
    let db_path = get_db_path(config)?;
    let db = Database::new(&db_path)?;
    tracing::info!("Database initialized at: {}", db_path.display());
    Ok(Arc::new(db))
}
