//! HTTP server

use std::path::PathBuf;

use clap::Args;
use innkeep_api::config::AppConfig;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Database file (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080 (overrides configuration)
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn execute(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(db) = args.db {
        config.database.path = db;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(innkeep_api::serve(config))?;
    Ok(())
}
