use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::rules::validation::{require_date_order, require_status, require_text};

string_enum! {
    pub enum LeaveType {
        Annual => "annual",
        Sick => "sick",
        Unpaid => "unpaid",
        Other => "other",
    }
}

string_enum! {
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

impl LeaveStatus {
    /// Requests that hold their dates
    pub const ACTIVE: &'static [LeaveStatus] = &[LeaveStatus::Pending, LeaveStatus::Approved];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive calendar days
    pub days: i64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveRequest {
    pub employee_id: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveFilter {
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
}

impl LeaveRequest {
    pub fn create(id: String, input: NewLeaveRequest) -> Result<Self> {
        require_text("employee_id", &input.employee_id)?;
        require_date_order("end_date", input.start_date, input.end_date)?;
        Ok(Self {
            id,
            employee_id: input.employee_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            days: (input.end_date - input.start_date).num_days() + 1,
            reason: input.reason,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_note: None,
            created_at: Utc::now(),
        })
    }

    pub fn approve(&mut self, reviewer: &str, at: DateTime<Utc>) -> Result<()> {
        require_status("leave request", &self.id, self.status, &[LeaveStatus::Pending], "approve")?;
        self.status = LeaveStatus::Approved;
        self.reviewed_by = Some(reviewer.to_string());
        self.reviewed_at = Some(at);
        Ok(())
    }

    pub fn reject(&mut self, reviewer: &str, note: Option<String>, at: DateTime<Utc>) -> Result<()> {
        require_status("leave request", &self.id, self.status, &[LeaveStatus::Pending], "reject")?;
        self.status = LeaveStatus::Rejected;
        self.reviewed_by = Some(reviewer.to_string());
        self.reviewed_at = Some(at);
        self.review_note = note;
        Ok(())
    }

    /// Pending requests, or approved ones that have not started yet
    pub fn cancel(&mut self, today: NaiveDate) -> Result<()> {
        require_status("leave request", &self.id, self.status, LeaveStatus::ACTIVE, "cancel")?;
        if self.status == LeaveStatus::Approved && self.start_date <= today {
            return Err(InnkeepError::InvalidTransition {
                entity: "leave request",
                id: self.id.clone(),
                status: "approved and started".to_string(),
                action: "cancel",
            });
        }
        self.status = LeaveStatus::Cancelled;
        Ok(())
    }

    /// Days of this request that fall inside `[from, to]`
    pub fn days_within(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        crate::ops::stay_ops::overlap_days(self.start_date, self.end_date, from, to)
    }
}
