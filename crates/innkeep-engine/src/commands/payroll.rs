//! Payroll runs
//!
//! A run is generated as a draft holding one payslip per employee on the
//! books during the period. Paying it posts the whole run as one
//! transaction: Dr Salaries & Wages (gross) / Cr the paying account (net)
//! / Cr Payroll Withholding Payable (withholding).

use chrono::{NaiveDate, Utc};
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{
    new_id, AttendanceFilter, EmployeeFilter, EmployeeStatus, LeaveFilter, LeaveStatus,
    LeaveType, NewJournalLine, NewTransaction, PayrollRun, PayrollStatus, Payslip,
    TransactionSource,
};
use innkeep_core::ops::payroll_ops::compute_pay;
use innkeep_core::rules::validation::require_date_order;
use innkeep_core::HotelSettings;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::posting::{asset_account, post_in};
use super::{begin, commit};
use crate::Result;

const SALARIES_AND_WAGES: &str = "5000";
const WITHHOLDING_PAYABLE: &str = "2200";
const BANK: &str = "1010";

fn payslips_for(
    conn: &Connection,
    run_id: &str,
    from: NaiveDate,
    to: NaiveDate,
    settings: &HotelSettings,
) -> Result<Vec<Payslip>> {
    let employees = SqliteRepo::list_employees(conn, &EmployeeFilter::default())?;
    let mut payslips = Vec::new();
    for employee in employees {
        let on_books = employee.hire_date <= to
            && (employee.status != EmployeeStatus::Terminated
                || employee.terminated_on.is_some_and(|t| t >= from));
        if !on_books {
            continue;
        }

        let attendance = SqliteRepo::list_attendance(
            conn,
            &AttendanceFilter {
                employee_id: Some(employee.id.clone()),
                from: Some(from),
                to: Some(to),
            },
        )?;
        let unpaid_leave_days: i64 = SqliteRepo::list_leave(
            conn,
            &LeaveFilter {
                employee_id: Some(employee.id.clone()),
                status: Some(LeaveStatus::Approved),
            },
        )?
        .iter()
        .filter(|l| l.leave_type == LeaveType::Unpaid)
        .map(|l| l.days_within(from, to))
        .sum();

        let pay = compute_pay(&employee, from, to, &attendance, unpaid_leave_days, settings);
        payslips.push(Payslip {
            id: new_id(),
            run_id: run_id.to_string(),
            employee_id: employee.id,
            regular_minutes: pay.regular_minutes,
            overtime_minutes: pay.overtime_minutes,
            base_pay_cents: pay.base_pay_cents,
            overtime_pay_cents: pay.overtime_pay_cents,
            unpaid_leave_deduction_cents: pay.unpaid_leave_deduction_cents,
            gross_cents: pay.gross_cents,
            withholding_cents: pay.withholding_cents,
            net_cents: pay.net_cents,
        });
    }
    Ok(payslips)
}

/// Draft a run for `[from, to]`.
///
/// A paid run sharing any day with the period blocks generation. A draft
/// for exactly the same period is replaced; a draft that only partly
/// overlaps must be deleted first.
pub fn payroll_generate(
    conn: &mut Connection,
    from: NaiveDate,
    to: NaiveDate,
    settings: &HotelSettings,
) -> Result<PayrollRun> {
    logged!("payroll_generate", {
        require_date_order("period_end", from, to)?;
        let tx = begin(conn)?;
        let run_id = new_id();
        for existing in SqliteRepo::overlapping_payroll_runs(&tx, from, to)? {
            let same_period = existing.period_start == from && existing.period_end == to;
            if existing.status == PayrollStatus::Draft && same_period {
                tracing::debug!(run_id = %existing.id, "replacing draft payroll run");
                SqliteRepo::delete_payroll_run(&tx, &existing.id)?;
                continue;
            }
            return Err(InnkeepError::Overlap {
                entity: "payroll run",
                id: run_id,
                other_id: existing.id,
            }
            .into());
        }

        let payslips = payslips_for(&tx, &run_id, from, to, settings)?;
        let run = PayrollRun::draft(run_id, from, to, payslips);
        SqliteRepo::insert_payroll_run(&tx, &run)?;
        commit(tx)?;
        Ok(run)
    })
}

/// Pay a draft run from an asset account, Bank by default
pub fn payroll_pay(
    conn: &mut Connection,
    id: &str,
    payment_account_id: Option<&str>,
    today: NaiveDate,
) -> Result<PayrollRun> {
    logged!("payroll_pay", run_id = id; {
        let tx = begin(conn)?;
        let mut run = SqliteRepo::require_payroll_run(&tx, id)?;
        run.ensure_draft("pay")?;
        let paid_from = asset_account(&tx, payment_account_id, BANK)?;

        let transaction_id = if run.total_gross_cents > 0 {
            let salaries = SqliteRepo::require_account_by_code(&tx, SALARIES_AND_WAGES)?;
            let mut lines = vec![NewJournalLine::debit(salaries.id, run.total_gross_cents)];
            if run.total_net_cents > 0 {
                lines.push(NewJournalLine::credit(paid_from.id.clone(), run.total_net_cents));
            }
            if run.total_deductions_cents > 0 {
                let withholding = SqliteRepo::require_account_by_code(&tx, WITHHOLDING_PAYABLE)?;
                lines.push(NewJournalLine::credit(withholding.id, run.total_deductions_cents));
            }
            let txn = post_in(
                &tx,
                &NewTransaction::system(
                    today,
                    format!("Payroll {} to {}", run.period_start, run.period_end),
                    TransactionSource::Payroll,
                    run.id.clone(),
                    lines,
                ),
            )?;
            Some(txn.id)
        } else {
            None
        };

        run.mark_paid(transaction_id, Utc::now())?;
        SqliteRepo::update_payroll_run(&tx, &run)?;
        commit(tx)?;
        Ok(run)
    })
}

pub fn payroll_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("payroll_delete", run_id = id; {
        SqliteRepo::require_payroll_run(conn, id)?.ensure_draft("delete")?;
        SqliteRepo::delete_payroll_run(conn, id)
    })
}

pub fn payroll_get(conn: &Connection, id: &str) -> Result<PayrollRun> {
    logged!("payroll_get", { SqliteRepo::require_payroll_run(conn, id) })
}

pub fn payroll_list(conn: &Connection) -> Result<Vec<PayrollRun>> {
    logged!("payroll_list", { SqliteRepo::list_payroll_runs(conn) })
}
