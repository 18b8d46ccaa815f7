//! Reports printed as pretty JSON

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use innkeep_api::config::AppConfig;
use innkeep_engine::commands::{reports, tax};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKind {
    TrialBalance,
    IncomeStatement,
    BalanceSheet,
    Occupancy,
    RevenueByCategory,
    Tax,
    Dashboard,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(value_enum)]
    pub kind: ReportKind,

    /// First day of the period (defaults to the first of this month)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the period (defaults to today)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Balance date for point-in-time reports (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Database file (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn execute(args: ReportArgs, config: AppConfig) -> anyhow::Result<()> {
    let conn = super::open_db(args.db, &config)?;
    let today = Utc::now().date_naive();
    let to = args.to.unwrap_or(today);
    let from = match args.from {
        Some(from) => from,
        None => to.with_day(1).context("no first day of month")?,
    };
    let as_of = args.as_of.unwrap_or(today);

    match args.kind {
        ReportKind::TrialBalance => print_json(&reports::trial_balance(&conn, as_of)?),
        ReportKind::IncomeStatement => print_json(&reports::income_statement(&conn, from, to)?),
        ReportKind::BalanceSheet => print_json(&reports::balance_sheet(&conn, as_of)?),
        ReportKind::Occupancy => print_json(&reports::occupancy(&conn, from, to)?),
        ReportKind::RevenueByCategory => {
            print_json(&reports::revenue_by_category(&conn, from, to)?)
        }
        ReportKind::Tax => print_json(&tax::tax_report(&conn, from, to)?),
        ReportKind::Dashboard => print_json(&reports::dashboard(&conn, as_of)?),
    }
}
