//! Time clock

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{new_id, AttendanceFilter, AttendanceRecord, NewAttendanceRecord};
use innkeep_core::ops::payroll_ops::summarize_attendance;
use innkeep_core::ops::AttendanceSummary;
use innkeep_core::rules::validation::require_date_order;
use innkeep_core::HotelSettings;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::{begin, commit};
use crate::Result;

/// Employee must be active with nothing left open on the clock
fn ensure_can_clock_in(conn: &Connection, employee_id: &str) -> Result<()> {
    SqliteRepo::require_employee(conn, employee_id)?.ensure_active("clock in")?;
    if let Some(open) = SqliteRepo::open_attendance(conn, employee_id)? {
        return Err(InnkeepError::InvalidTransition {
            entity: "attendance record",
            id: open.id,
            status: "open".to_string(),
            action: "clock in over",
        }
        .into());
    }
    Ok(())
}

pub fn clock_in(
    conn: &mut Connection,
    employee_id: &str,
    at: DateTime<Utc>,
    notes: Option<String>,
) -> Result<AttendanceRecord> {
    logged!("attendance_clock_in", employee_id = employee_id; {
        let tx = begin(conn)?;
        ensure_can_clock_in(&tx, employee_id)?;
        let record = AttendanceRecord::open(new_id(), employee_id.to_string(), at, notes);
        SqliteRepo::insert_attendance(&tx, &record)?;
        commit(tx)?;
        Ok(record)
    })
}

pub fn clock_out(conn: &Connection, employee_id: &str, at: DateTime<Utc>) -> Result<AttendanceRecord> {
    logged!("attendance_clock_out", employee_id = employee_id; {
        SqliteRepo::require_employee(conn, employee_id)?;
        let mut record = SqliteRepo::open_attendance(conn, employee_id)?
            .ok_or_else(|| InnkeepError::not_found("open attendance record", employee_id))?;
        record.close(at)?;
        SqliteRepo::update_attendance(conn, &record)?;
        Ok(record)
    })
}

/// Enter a complete shift after the fact
pub fn attendance_record(conn: &mut Connection, input: NewAttendanceRecord) -> Result<AttendanceRecord> {
    logged!("attendance_record", {
        let tx = begin(conn)?;
        ensure_can_clock_in(&tx, &input.employee_id)?;
        let mut record = AttendanceRecord::open(new_id(), input.employee_id, input.clock_in, input.notes);
        record.close(input.clock_out)?;
        SqliteRepo::insert_attendance(&tx, &record)?;
        commit(tx)?;
        Ok(record)
    })
}

pub fn attendance_list(conn: &Connection, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
    logged!("attendance_list", { SqliteRepo::list_attendance(conn, filter) })
}

pub fn attendance_summary(
    conn: &Connection,
    employee_id: &str,
    from: NaiveDate,
    to: NaiveDate,
    settings: &HotelSettings,
) -> Result<AttendanceSummary> {
    logged!("attendance_summary", employee_id = employee_id; {
        require_date_order("to", from, to)?;
        SqliteRepo::require_employee(conn, employee_id)?;
        let records = SqliteRepo::list_attendance(
            conn,
            &AttendanceFilter {
                employee_id: Some(employee_id.to_string()),
                from: Some(from),
                to: Some(to),
            },
        )?;
        Ok(summarize_attendance(&records, settings.standard_day_minutes))
    })
}
