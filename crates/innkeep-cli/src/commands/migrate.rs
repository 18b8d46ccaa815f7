//! Database setup

use std::path::PathBuf;

use clap::Args;
use innkeep_api::config::AppConfig;
use innkeep_store::migrations::applied_migrations;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Database file (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn execute(args: MigrateArgs, config: AppConfig) -> anyhow::Result<()> {
    let path = args.db.clone().unwrap_or_else(|| config.database.path.clone());
    let conn = super::open_db(args.db, &config)?;
    let applied = applied_migrations(&conn)?;
    println!("Database ready: {}", path.display());
    for id in applied {
        println!("  applied: {}", id);
    }
    Ok(())
}
