//! Payslip arithmetic
//!
//! All divisions round half away from zero, once, at the end of each figure.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{AttendanceRecord, Employee, PayType};
use crate::money::{apply_bp, div_round, BP_SCALE};
use crate::settings::HotelSettings;

const DAYS_PER_YEAR: i128 = 365;
const MINUTES_PER_HOUR: i128 = 60;

/// Worked time split at the standard day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub days_worked: i64,
    pub total_minutes: i64,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
}

/// Overtime is counted per record, not per week
pub fn summarize_attendance(records: &[AttendanceRecord], standard_day_minutes: i64) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    let mut days: Vec<NaiveDate> = Vec::new();
    for rec in records.iter().filter(|r| !r.is_open()) {
        let worked = rec.worked_minutes.max(0);
        let regular = worked.min(standard_day_minutes);
        summary.total_minutes += worked;
        summary.regular_minutes += regular;
        summary.overtime_minutes += worked - regular;
        if !days.contains(&rec.work_date) {
            days.push(rec.work_date);
        }
    }
    summary.days_worked = days.len() as i64;
    summary
}

/// Figures for one payslip before ids are attached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayComputation {
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub base_pay_cents: i64,
    pub overtime_pay_cents: i64,
    pub unpaid_leave_deduction_cents: i64,
    pub gross_cents: i64,
    pub withholding_cents: i64,
    pub net_cents: i64,
}

/// Compute pay for `[period_start, period_end]`
///
/// `attendance` must already be limited to the period; `unpaid_leave_days`
/// counts approved unpaid leave days inside it.
pub fn compute_pay(
    employee: &Employee,
    period_start: NaiveDate,
    period_end: NaiveDate,
    attendance: &[AttendanceRecord],
    unpaid_leave_days: i64,
    settings: &HotelSettings,
) -> PayComputation {
    let mut pay = PayComputation::default();

    match employee.pay_type {
        PayType::Salaried => {
            let salary = employee.base_salary_cents as i128;
            let days = employee.days_employed(period_start, period_end) as i128;
            pay.base_pay_cents = div_round(salary * days, DAYS_PER_YEAR);
            pay.unpaid_leave_deduction_cents =
                div_round(salary * unpaid_leave_days.max(0) as i128, DAYS_PER_YEAR);
        }
        PayType::Hourly => {
            let summary = summarize_attendance(attendance, settings.standard_day_minutes);
            let rate = employee.hourly_rate_cents as i128;
            pay.regular_minutes = summary.regular_minutes;
            pay.overtime_minutes = summary.overtime_minutes;
            pay.base_pay_cents = div_round(summary.regular_minutes as i128 * rate, MINUTES_PER_HOUR);
            pay.overtime_pay_cents = div_round(
                summary.overtime_minutes as i128 * rate * settings.overtime_multiplier_bp as i128,
                MINUTES_PER_HOUR * BP_SCALE as i128,
            );
        }
    }

    pay.gross_cents =
        (pay.base_pay_cents + pay.overtime_pay_cents - pay.unpaid_leave_deduction_cents).max(0);
    pay.withholding_cents = apply_bp(pay.gross_cents, settings.withholding_bp);
    pay.net_cents = pay.gross_cents - pay.withholding_cents;
    pay
}
