use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};

/// One shift worked by an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub worked_minutes: i64,
    pub notes: Option<String>,
}

/// A complete shift entered after the fact
#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendanceRecord {
    pub employee_id: String,
    pub clock_in: DateTime<Utc>,
    pub clock_out: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceRecord {
    pub fn open(id: String, employee_id: String, at: DateTime<Utc>, notes: Option<String>) -> Self {
        Self {
            id,
            employee_id,
            work_date: at.date_naive(),
            clock_in: at,
            clock_out: None,
            worked_minutes: 0,
            notes,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn close(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.clock_out.is_some() {
            return Err(InnkeepError::InvalidTransition {
                entity: "attendance record",
                id: self.id.clone(),
                status: "closed".to_string(),
                action: "clock out",
            });
        }
        if at <= self.clock_in {
            return Err(InnkeepError::invalid(
                "clock_out",
                "must be after clock_in",
            ));
        }
        self.clock_out = Some(at);
        self.worked_minutes = (at - self.clock_in).num_minutes();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_close_computes_whole_minutes() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 1, 16, 30, 59).unwrap();
        let mut rec = AttendanceRecord::open("a-1".to_string(), "e-1".to_string(), start, None);
        assert!(rec.is_open());
        rec.close(end).unwrap();
        assert_eq!(rec.worked_minutes, 510);
        assert!(rec.close(end).is_err());
    }

    #[test]
    fn test_close_before_open_rejected() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        let mut rec = AttendanceRecord::open("a-1".to_string(), "e-1".to_string(), start, None);
        assert!(rec.close(start).is_err());
    }
}
