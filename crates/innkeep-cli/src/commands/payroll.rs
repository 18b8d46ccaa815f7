//! Payroll batch jobs

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use innkeep_api::config::AppConfig;
use innkeep_core::model::PayrollRun;
use innkeep_engine::commands::payroll;

#[derive(Debug, Args)]
pub struct PayrollArgs {
    #[command(subcommand)]
    pub command: PayrollCommand,

    /// Database file (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum PayrollCommand {
    /// Compute a draft run for a pay period
    Generate(GenerateArgs),
    /// Pay a draft run and post it to the ledger
    Pay(PayArgs),
    /// List runs
    List,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub from: NaiveDate,

    #[arg(long)]
    pub to: NaiveDate,
}

#[derive(Debug, Args)]
pub struct PayArgs {
    /// Payroll run id
    #[arg(long)]
    pub run: String,

    /// Asset account to pay from (defaults to Bank)
    #[arg(long)]
    pub account: Option<String>,

    /// Posting date (defaults to today)
    #[arg(long)]
    pub on: Option<NaiveDate>,
}

fn print_run(run: &PayrollRun) {
    println!("Payroll run {}:", run.id);
    println!("  period: {} to {}", run.period_start, run.period_end);
    println!("  status: {}", run.status);
    println!("  payslips: {}", run.payslips.len());
    println!("  gross_cents: {}", run.total_gross_cents);
    println!("  deductions_cents: {}", run.total_deductions_cents);
    println!("  net_cents: {}", run.total_net_cents);
}

pub fn execute(args: PayrollArgs, config: AppConfig) -> anyhow::Result<()> {
    let mut conn = super::open_db(args.db, &config)?;
    match args.command {
        PayrollCommand::Generate(generate) => {
            let run =
                payroll::payroll_generate(&mut conn, generate.from, generate.to, &config.payroll)?;
            print_run(&run);
        }
        PayrollCommand::Pay(pay) => {
            let on = pay.on.unwrap_or_else(|| Utc::now().date_naive());
            let run = payroll::payroll_pay(&mut conn, &pay.run, pay.account.as_deref(), on)?;
            print_run(&run);
            if let Some(txn) = &run.transaction_id {
                println!("  transaction_id: {}", txn);
            }
        }
        PayrollCommand::List => {
            for run in payroll::payroll_list(&conn)? {
                println!(
                    "{}  {} to {}  {}  net {}",
                    run.id, run.period_start, run.period_end, run.status, run.total_net_cents
                );
            }
        }
    }
    Ok(())
}
