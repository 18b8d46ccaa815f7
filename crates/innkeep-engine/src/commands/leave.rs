//! Leave requests and annual entitlement

use chrono::{Datelike, NaiveDate, Utc};
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{
    new_id, Employee, LeaveFilter, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
};
use innkeep_core::ops::leave_ops::{ensure_leave_fits, leave_balance as compute_balance};
use innkeep_core::ops::LeaveBalance;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::{begin, commit};
use crate::Result;

fn employee_requests(conn: &Connection, employee_id: &str) -> Result<Vec<LeaveRequest>> {
    SqliteRepo::list_leave(
        conn,
        &LeaveFilter {
            employee_id: Some(employee_id.to_string()),
            status: None,
        },
    )
}

/// Balance of the year the request starts in, which is where it is charged
fn balance_for(employee: &Employee, request: &LeaveRequest, all: &[LeaveRequest]) -> LeaveBalance {
    let others: Vec<LeaveRequest> = all.iter().filter(|r| r.id != request.id).cloned().collect();
    compute_balance(employee, request.start_date.year(), &others)
}

pub fn leave_request(conn: &mut Connection, input: NewLeaveRequest) -> Result<LeaveRequest> {
    logged!("leave_request", {
        let tx = begin(conn)?;
        let employee = SqliteRepo::require_employee(&tx, &input.employee_id)?;
        employee.ensure_not_terminated("request leave for")?;
        let request = LeaveRequest::create(new_id(), input)?;

        let existing = employee_requests(&tx, &employee.id)?;
        let clash = existing.iter().find(|r| {
            LeaveStatus::ACTIVE.contains(&r.status)
                && r.start_date <= request.end_date
                && request.start_date <= r.end_date
        });
        if let Some(other) = clash {
            return Err(InnkeepError::Overlap {
                entity: "leave request",
                id: request.id.clone(),
                other_id: other.id.clone(),
            }
            .into());
        }
        if request.leave_type == LeaveType::Annual {
            let balance = balance_for(&employee, &request, &existing);
            ensure_leave_fits(&balance, request.days, true)?;
        }

        SqliteRepo::insert_leave(&tx, &request)?;
        commit(tx)?;
        Ok(request)
    })
}

/// Annual requests are re-checked against approved days only
pub fn leave_approve(conn: &mut Connection, id: &str, reviewer: &str) -> Result<LeaveRequest> {
    logged!("leave_approve", leave_id = id; {
        let tx = begin(conn)?;
        let mut request = SqliteRepo::require_leave(&tx, id)?;
        if request.leave_type == LeaveType::Annual && request.status == LeaveStatus::Pending {
            let employee = SqliteRepo::require_employee(&tx, &request.employee_id)?;
            let all = employee_requests(&tx, &employee.id)?;
            let balance = balance_for(&employee, &request, &all);
            ensure_leave_fits(&balance, request.days, false)?;
        }
        request.approve(reviewer, Utc::now())?;
        SqliteRepo::update_leave(&tx, &request)?;
        commit(tx)?;
        Ok(request)
    })
}

pub fn leave_reject(
    conn: &Connection,
    id: &str,
    reviewer: &str,
    note: Option<String>,
) -> Result<LeaveRequest> {
    logged!("leave_reject", leave_id = id; {
        let mut request = SqliteRepo::require_leave(conn, id)?;
        request.reject(reviewer, note, Utc::now())?;
        SqliteRepo::update_leave(conn, &request)?;
        Ok(request)
    })
}

pub fn leave_cancel(conn: &Connection, id: &str, today: NaiveDate) -> Result<LeaveRequest> {
    logged!("leave_cancel", leave_id = id; {
        let mut request = SqliteRepo::require_leave(conn, id)?;
        request.cancel(today)?;
        SqliteRepo::update_leave(conn, &request)?;
        Ok(request)
    })
}

pub fn leave_get(conn: &Connection, id: &str) -> Result<LeaveRequest> {
    logged!("leave_get", { SqliteRepo::require_leave(conn, id) })
}

pub fn leave_list(conn: &Connection, filter: &LeaveFilter) -> Result<Vec<LeaveRequest>> {
    logged!("leave_list", { SqliteRepo::list_leave(conn, filter) })
}

pub fn leave_balance(conn: &Connection, employee_id: &str, year: i32) -> Result<LeaveBalance> {
    logged!("leave_balance", employee_id = employee_id; {
        let employee = SqliteRepo::require_employee(conn, employee_id)?;
        let requests = employee_requests(conn, employee_id)?;
        Ok(compute_balance(&employee, year, &requests))
    })
}
