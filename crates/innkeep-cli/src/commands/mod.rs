pub mod migrate;
pub mod payroll;
pub mod report;
pub mod serve;

use std::path::PathBuf;

use innkeep_api::config::AppConfig;
use rusqlite::Connection;

/// `--db` wins over the configured path
pub(crate) fn open_db(db: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<Connection> {
    let path = db.unwrap_or_else(|| config.database.path.clone());
    Ok(innkeep_store::db::open_and_migrate(&path)?)
}
