//! Innkeep CLI
//!
//! Operator entry point: database setup, the HTTP server, and the batch
//! jobs (reports, payroll) that are easier to script than to click.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use innkeep_api::config::AppConfig;
use innkeep_core::logging_facility;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "innkeep")]
#[command(about = "Innkeep - hotel property management backend", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/innkeep.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database
    Migrate(commands::migrate::MigrateArgs),
    /// Run the HTTP API
    Serve(commands::serve::ServeArgs),
    /// Print a report as JSON
    Report(commands::report::ReportArgs),
    /// Generate and pay payroll runs
    Payroll(commands::payroll::PayrollArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging_facility::init(config.logging.profile());

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args, config),
        Commands::Serve(args) => commands::serve::execute(args, config),
        Commands::Report(args) => commands::report::execute(args, config),
        Commands::Payroll(args) => commands::payroll::execute(args, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
