//! Report queries
//!
//! Financial statements fold over posted journal lines loaded by the
//! hydration layer; the front-office reports read reservations and
//! invoices directly.

use chrono::{Datelike, NaiveDate};
use innkeep_core::model::{EmployeeStatus, LeaveStatus, RoomFilter, TaskStatus};
use innkeep_core::reports::{
    self, BalanceSheet, Dashboard, IncomeStatement, OccupancyReport, RevenueByCategory,
    TrialBalance,
};
use innkeep_core::rules::validation::require_date_order;
use innkeep_store::repo::hydration::{load_all_accounts, load_posted_lines};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

fn sellable_rooms(conn: &Connection) -> Result<i64> {
    let rooms = SqliteRepo::list_rooms(conn, &RoomFilter::default())?;
    Ok(rooms.iter().filter(|r| r.status.is_sellable()).count() as i64)
}

fn income_statement_in(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<IncomeStatement> {
    require_date_order("to", from, to)?;
    let accounts = load_all_accounts(conn)?;
    let lines = load_posted_lines(conn, Some(to), None)?;
    Ok(reports::income_statement(&accounts, &lines, from, to))
}

fn occupancy_in(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<OccupancyReport> {
    require_date_order("to", from, to)?;
    let stays = SqliteRepo::sold_stays(conn, from, to)?;
    Ok(reports::occupancy(from, to, sellable_rooms(conn)?, &stays))
}

pub fn trial_balance(conn: &Connection, as_of: NaiveDate) -> Result<TrialBalance> {
    logged!("report_trial_balance", {
        let accounts = load_all_accounts(conn)?;
        let lines = load_posted_lines(conn, Some(as_of), None)?;
        Ok(reports::trial_balance(&accounts, &lines, as_of))
    })
}

pub fn income_statement(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<IncomeStatement> {
    logged!("report_income_statement", { income_statement_in(conn, from, to) })
}

pub fn balance_sheet(conn: &Connection, as_of: NaiveDate) -> Result<BalanceSheet> {
    logged!("report_balance_sheet", {
        let accounts = load_all_accounts(conn)?;
        let lines = load_posted_lines(conn, Some(as_of), None)?;
        Ok(reports::balance_sheet(&accounts, &lines, as_of))
    })
}

pub fn occupancy(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<OccupancyReport> {
    logged!("report_occupancy", { occupancy_in(conn, from, to) })
}

pub fn revenue_by_category(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<RevenueByCategory> {
    logged!("report_revenue_by_category", {
        require_date_order("to", from, to)?;
        let lines = SqliteRepo::billed_lines(conn, from, to)?;
        Ok(reports::revenue_by_category(from, to, &lines))
    })
}

/// Front-page figures for `today`; money figures are month to date
pub fn dashboard(conn: &Connection, today: NaiveDate) -> Result<Dashboard> {
    logged!("report_dashboard", {
        let status_counts = SqliteRepo::room_status_counts(conn)?;
        let month_start = today.with_day(1).unwrap_or(today);
        let income = income_statement_in(conn, month_start, today)?;
        let tonight = occupancy_in(conn, today, today)?;
        let outstanding: i64 = SqliteRepo::outstanding_invoices(conn)?
            .iter()
            .map(|i| i.balance_cents)
            .sum();
        let open_tasks = SqliteRepo::count_tasks_with_status(conn, TaskStatus::Pending)?
            + SqliteRepo::count_tasks_with_status(conn, TaskStatus::InProgress)?;

        Ok(Dashboard {
            date: today,
            total_rooms: status_counts.iter().map(|(_, n)| n).sum(),
            rooms_by_status: status_counts
                .iter()
                .map(|(status, n)| (status.to_string(), *n))
                .collect(),
            occupancy_today_bp: tonight.occupancy_bp,
            arrivals_today: SqliteRepo::arrivals(conn, today)?.len() as i64,
            departures_today: SqliteRepo::departures(conn, today)?.len() as i64,
            in_house: SqliteRepo::in_house(conn)?.len() as i64,
            month_to_date_revenue_cents: income.total_revenue_cents,
            month_to_date_expense_cents: income.total_expense_cents,
            month_to_date_net_income_cents: income.net_income_cents,
            outstanding_balance_cents: outstanding,
            pending_housekeeping_tasks: open_tasks,
            pending_leave_requests: SqliteRepo::count_leave_with_status(conn, LeaveStatus::Pending)?,
            active_employees: SqliteRepo::count_employees_with_status(conn, EmployeeStatus::Active)?,
        })
    })
}
