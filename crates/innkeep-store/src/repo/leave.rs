//! Leave requests

use innkeep_core::model::{LeaveFilter, LeaveRequest, LeaveStatus};
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, opt_ts, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const LEAVE_COLUMNS: &str = "id, employee_id, leave_type, start_date, end_date, days, reason, \
                             status, reviewed_by, reviewed_at, review_note, created_at";

fn leave_from_row(row: &Row<'_>) -> rusqlite::Result<LeaveRequest> {
    Ok(LeaveRequest {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        leave_type: enum_col(row, 2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        days: row.get(5)?,
        reason: row.get(6)?,
        status: enum_col(row, 7)?,
        reviewed_by: row.get(8)?,
        reviewed_at: opt_ts(row.get(9)?),
        review_note: row.get(10)?,
        created_at: ts(row.get(11)?),
    })
}

impl SqliteRepo {
    pub fn insert_leave(conn: &Connection, l: &LeaveRequest) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO leave_requests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                LEAVE_COLUMNS
            ),
            params![
                l.id,
                l.employee_id,
                l.leave_type.as_str(),
                l.start_date,
                l.end_date,
                l.days,
                l.reason,
                l.status.as_str(),
                l.reviewed_by,
                l.reviewed_at.map(|t| t.timestamp()),
                l.review_note,
                l.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_leave(conn: &Connection, l: &LeaveRequest) -> Result<()> {
        execute_one(
            conn,
            "UPDATE leave_requests SET status = ?2, reviewed_by = ?3, reviewed_at = ?4,
                review_note = ?5
             WHERE id = ?1",
            params![
                l.id,
                l.status.as_str(),
                l.reviewed_by,
                l.reviewed_at.map(|t| t.timestamp()),
                l.review_note,
            ],
            "leave request",
            &l.id,
        )
    }

    pub fn get_leave(conn: &Connection, id: &str) -> Result<Option<LeaveRequest>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM leave_requests WHERE id = ?1", LEAVE_COLUMNS),
            [id],
            leave_from_row,
        )
    }

    pub fn require_leave(conn: &Connection, id: &str) -> Result<LeaveRequest> {
        Self::get_leave(conn, id)?.ok_or_else(|| not_found("leave request", id))
    }

    pub fn list_leave(conn: &Connection, filter: &LeaveFilter) -> Result<Vec<LeaveRequest>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM leave_requests
                 WHERE (?1 IS NULL OR employee_id = ?1) AND (?2 IS NULL OR status = ?2)
                 ORDER BY start_date, id",
                LEAVE_COLUMNS
            ),
            params![filter.employee_id, filter.status.map(|s| s.as_str())],
            leave_from_row,
        )
    }

    pub fn count_leave_with_status(conn: &Connection, status: LeaveStatus) -> Result<i64> {
        count(
            conn,
            "SELECT COUNT(*) FROM leave_requests WHERE status = ?1",
            [status.as_str()],
        )
    }
}
