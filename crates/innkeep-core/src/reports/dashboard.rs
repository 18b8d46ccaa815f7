use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Front-page figures for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub rooms_by_status: BTreeMap<String, i64>,
    pub occupancy_today_bp: i64,
    pub arrivals_today: i64,
    pub departures_today: i64,
    pub in_house: i64,
    pub month_to_date_revenue_cents: i64,
    pub month_to_date_expense_cents: i64,
    pub month_to_date_net_income_cents: i64,
    pub outstanding_balance_cents: i64,
    pub pending_housekeeping_tasks: i64,
    pub pending_leave_requests: i64,
    pub active_employees: i64,
}
