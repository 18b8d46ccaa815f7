//! Annual leave entitlement

use chrono::Datelike;
use serde::Serialize;

use crate::errors::{InnkeepError, Result};
use crate::model::{Employee, LeaveRequest, LeaveStatus, LeaveType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub employee_id: String,
    pub year: i32,
    pub entitlement_days: i64,
    pub taken_days: i64,
    pub pending_days: i64,
    pub remaining_days: i64,
}

/// Annual requests are charged to the year they start in
pub fn leave_balance(employee: &Employee, year: i32, requests: &[LeaveRequest]) -> LeaveBalance {
    let annual = requests.iter().filter(|r| {
        r.employee_id == employee.id
            && r.leave_type == LeaveType::Annual
            && r.start_date.year() == year
    });
    let mut taken = 0;
    let mut pending = 0;
    for r in annual {
        match r.status {
            LeaveStatus::Approved => taken += r.days,
            LeaveStatus::Pending => pending += r.days,
            _ => {}
        }
    }
    LeaveBalance {
        employee_id: employee.id.clone(),
        year,
        entitlement_days: employee.annual_leave_days,
        taken_days: taken,
        pending_days: pending,
        remaining_days: employee.annual_leave_days - taken,
    }
}

/// Fail if `days` more annual leave would exceed what remains.
///
/// `include_pending` counts other pending requests against the balance,
/// which is how new requests are judged; approvals only count approved days.
pub fn ensure_leave_fits(balance: &LeaveBalance, days: i64, include_pending: bool) -> Result<()> {
    let committed = if include_pending {
        balance.remaining_days - balance.pending_days
    } else {
        balance.remaining_days
    };
    if days > committed {
        return Err(InnkeepError::InsufficientLeaveBalance {
            employee_id: balance.employee_id.clone(),
            requested: days,
            remaining: committed.max(0),
        });
    }
    Ok(())
}
