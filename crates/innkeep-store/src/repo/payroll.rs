//! Payroll runs and payslips

use chrono::NaiveDate;
use innkeep_core::model::{PayrollRun, Payslip};
use rusqlite::{params, Connection, Row};

use super::rows::{enum_col, execute_one, opt_ts, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const RUN_COLUMNS: &str = "id, period_start, period_end, status, total_gross_cents, \
     total_deductions_cents, total_net_cents, transaction_id, created_at, paid_at";

const PAYSLIP_COLUMNS: &str = "id, run_id, employee_id, regular_minutes, overtime_minutes, \
     base_pay_cents, overtime_pay_cents, unpaid_leave_deduction_cents, gross_cents, \
     withholding_cents, net_cents";

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<PayrollRun> {
    Ok(PayrollRun {
        id: row.get(0)?,
        period_start: row.get(1)?,
        period_end: row.get(2)?,
        status: enum_col(row, 3)?,
        total_gross_cents: row.get(4)?,
        total_deductions_cents: row.get(5)?,
        total_net_cents: row.get(6)?,
        transaction_id: row.get(7)?,
        payslips: Vec::new(),
        created_at: ts(row.get(8)?),
        paid_at: opt_ts(row.get(9)?),
    })
}

fn payslip_from_row(row: &Row<'_>) -> rusqlite::Result<Payslip> {
    Ok(Payslip {
        id: row.get(0)?,
        run_id: row.get(1)?,
        employee_id: row.get(2)?,
        regular_minutes: row.get(3)?,
        overtime_minutes: row.get(4)?,
        base_pay_cents: row.get(5)?,
        overtime_pay_cents: row.get(6)?,
        unpaid_leave_deduction_cents: row.get(7)?,
        gross_cents: row.get(8)?,
        withholding_cents: row.get(9)?,
        net_cents: row.get(10)?,
    })
}

fn with_payslips(conn: &Connection, mut run: PayrollRun) -> Result<PayrollRun> {
    run.payslips = query_all(
        conn,
        &format!(
            "SELECT {} FROM payslips WHERE run_id = ?1 ORDER BY employee_id",
            PAYSLIP_COLUMNS
        ),
        [&run.id],
        payslip_from_row,
    )?;
    Ok(run)
}

impl SqliteRepo {
    /// Write the run and all of its payslips
    pub fn insert_payroll_run(conn: &Connection, run: &PayrollRun) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO payroll_runs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                RUN_COLUMNS
            ),
            params![
                run.id,
                run.period_start,
                run.period_end,
                run.status.as_str(),
                run.total_gross_cents,
                run.total_deductions_cents,
                run.total_net_cents,
                run.transaction_id,
                run.created_at.timestamp(),
                run.paid_at.map(|t| t.timestamp()),
            ],
        )
        .map_err(from_rusqlite)?;

        let mut stmt = conn
            .prepare(&format!(
                "INSERT INTO payslips ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                PAYSLIP_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        for slip in &run.payslips {
            stmt.execute(params![
                slip.id,
                slip.run_id,
                slip.employee_id,
                slip.regular_minutes,
                slip.overtime_minutes,
                slip.base_pay_cents,
                slip.overtime_pay_cents,
                slip.unpaid_leave_deduction_cents,
                slip.gross_cents,
                slip.withholding_cents,
                slip.net_cents,
            ])
            .map_err(from_rusqlite)?;
        }
        Ok(())
    }

    pub fn update_payroll_run(conn: &Connection, run: &PayrollRun) -> Result<()> {
        execute_one(
            conn,
            "UPDATE payroll_runs SET status = ?2, transaction_id = ?3, paid_at = ?4 WHERE id = ?1",
            params![
                run.id,
                run.status.as_str(),
                run.transaction_id,
                run.paid_at.map(|t| t.timestamp()),
            ],
            "payroll run",
            &run.id,
        )
    }

    pub fn get_payroll_run(conn: &Connection, id: &str) -> Result<Option<PayrollRun>> {
        let header = query_opt(
            conn,
            &format!("SELECT {} FROM payroll_runs WHERE id = ?1", RUN_COLUMNS),
            [id],
            run_from_row,
        )?;
        header.map(|run| with_payslips(conn, run)).transpose()
    }

    pub fn require_payroll_run(conn: &Connection, id: &str) -> Result<PayrollRun> {
        Self::get_payroll_run(conn, id)?.ok_or_else(|| not_found("payroll run", id))
    }

    /// Newest period first
    pub fn list_payroll_runs(conn: &Connection) -> Result<Vec<PayrollRun>> {
        let headers = query_all(
            conn,
            &format!(
                "SELECT {} FROM payroll_runs ORDER BY period_start DESC, id DESC",
                RUN_COLUMNS
            ),
            [],
            run_from_row,
        )?;
        headers.into_iter().map(|run| with_payslips(conn, run)).collect()
    }

    /// Runs whose period shares at least one day with `[from, to]`
    pub fn overlapping_payroll_runs(
        conn: &Connection,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PayrollRun>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM payroll_runs WHERE period_start <= ?2 AND period_end >= ?1
                 ORDER BY period_start",
                RUN_COLUMNS
            ),
            params![from, to],
            run_from_row,
        )
    }

    /// Payslips go with the run
    pub fn delete_payroll_run(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM payroll_runs WHERE id = ?1", [id], "payroll run", id)
    }
}
