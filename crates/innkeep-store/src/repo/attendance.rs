//! Attendance records

use innkeep_core::model::{AttendanceFilter, AttendanceRecord};
use rusqlite::{params, Connection, Row};

use super::rows::{execute_one, opt_ts, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, work_date, clock_in, clock_out, worked_minutes, notes";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        work_date: row.get(2)?,
        clock_in: ts(row.get(3)?),
        clock_out: opt_ts(row.get(4)?),
        worked_minutes: row.get(5)?,
        notes: row.get(6)?,
    })
}

impl SqliteRepo {
    pub fn insert_attendance(conn: &Connection, r: &AttendanceRecord) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO attendance ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                ATTENDANCE_COLUMNS
            ),
            params![
                r.id,
                r.employee_id,
                r.work_date,
                r.clock_in.timestamp(),
                r.clock_out.map(|t| t.timestamp()),
                r.worked_minutes,
                r.notes,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_attendance(conn: &Connection, r: &AttendanceRecord) -> Result<()> {
        execute_one(
            conn,
            "UPDATE attendance SET clock_out = ?2, worked_minutes = ?3, notes = ?4 WHERE id = ?1",
            params![
                r.id,
                r.clock_out.map(|t| t.timestamp()),
                r.worked_minutes,
                r.notes,
            ],
            "attendance record",
            &r.id,
        )
    }

    pub fn get_attendance(conn: &Connection, id: &str) -> Result<Option<AttendanceRecord>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM attendance WHERE id = ?1", ATTENDANCE_COLUMNS),
            [id],
            record_from_row,
        )
    }

    pub fn require_attendance(conn: &Connection, id: &str) -> Result<AttendanceRecord> {
        Self::get_attendance(conn, id)?.ok_or_else(|| not_found("attendance record", id))
    }

    /// The employee's record without a clock-out, if any
    pub fn open_attendance(conn: &Connection, employee_id: &str) -> Result<Option<AttendanceRecord>> {
        query_opt(
            conn,
            &format!(
                "SELECT {} FROM attendance WHERE employee_id = ?1 AND clock_out IS NULL
                 ORDER BY clock_in DESC LIMIT 1",
                ATTENDANCE_COLUMNS
            ),
            [employee_id],
            record_from_row,
        )
    }

    pub fn list_attendance(
        conn: &Connection,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM attendance
                 WHERE (?1 IS NULL OR employee_id = ?1)
                   AND (?2 IS NULL OR work_date >= ?2)
                   AND (?3 IS NULL OR work_date <= ?3)
                 ORDER BY clock_in, id",
                ATTENDANCE_COLUMNS
            ),
            params![filter.employee_id, filter.from, filter.to],
            record_from_row,
        )
    }
}
