// Integration tests for staff: time clock, leave, payroll and reviews.

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use innkeep_core::errors::ExErrorKind;
use innkeep_core::model::*;
use innkeep_core::HotelSettings;
use innkeep_engine::commands::{attendance, employees, leave, payroll, performance};
use rusqlite::Connection;

fn at(m: u32, d: u32, h: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, m, d, h, 0, 0).unwrap()
}

fn ask(conn: &mut Connection, e: &Employee, kind: LeaveType, from: (u32, u32), to: (u32, u32)) -> LeaveRequest {
    leave::leave_request(
        conn,
        NewLeaveRequest {
            employee_id: e.id.clone(),
            leave_type: kind,
            start_date: date(from.0, from.1),
            end_date: date(to.0, to.1),
            reason: None,
        },
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// time clock
// ---------------------------------------------------------------------------

#[test]
fn test_one_open_shift_per_employee() {
    let (_tmp, mut conn) = setup_db();
    let e = employee(&conn, PayType::Hourly, date(1, 5));

    attendance::clock_in(&mut conn, &e.id, at(4, 6, 9), None).unwrap();
    let err = attendance::clock_in(&mut conn, &e.id, at(4, 6, 10), None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);

    let closed = attendance::clock_out(&conn, &e.id, at(4, 6, 19)).unwrap();
    assert_eq!(closed.worked_minutes, 600);

    let err = attendance::clock_out(&conn, &e.id, at(4, 6, 20)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let summary =
        attendance::attendance_summary(&conn, &e.id, date(4, 1), date(4, 30), &HotelSettings::default()).unwrap();
    assert_eq!(summary.days_worked, 1);
    assert_eq!(summary.regular_minutes, 480);
    assert_eq!(summary.overtime_minutes, 120);
}

#[test]
fn test_terminated_employee_cannot_clock_in() {
    let (_tmp, mut conn) = setup_db();
    let e = employee(&conn, PayType::Hourly, date(1, 5));
    employees::employee_terminate(&conn, &e.id, date(3, 31)).unwrap();

    let err = attendance::clock_in(&mut conn, &e.id, at(4, 6, 9), None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
}

// ---------------------------------------------------------------------------
// leave
// ---------------------------------------------------------------------------

#[test]
fn test_annual_leave_respects_entitlement() {
    let (_tmp, mut conn) = setup_db();
    let e = employee(&conn, PayType::Salaried, date(1, 5));

    let first = ask(&mut conn, &e, LeaveType::Annual, (4, 1), (4, 6));
    assert_eq!(first.days, 6);

    // 10 entitled, 6 pending
    let err = leave::leave_request(
        &mut conn,
        NewLeaveRequest {
            employee_id: e.id.clone(),
            leave_type: LeaveType::Annual,
            start_date: date(4, 20),
            end_date: date(4, 24),
            reason: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InsufficientLeaveBalance);

    leave::leave_approve(&mut conn, &first.id, "head of housekeeping").unwrap();
    let balance = leave::leave_balance(&conn, &e.id, 2026).unwrap();
    assert_eq!(balance.taken_days, 6);
    assert_eq!(balance.pending_days, 0);
    assert_eq!(balance.remaining_days, 4);
}

#[test]
fn test_overlapping_leave_is_refused() {
    let (_tmp, mut conn) = setup_db();
    let e = employee(&conn, PayType::Salaried, date(1, 5));
    ask(&mut conn, &e, LeaveType::Sick, (4, 1), (4, 2));

    let err = leave::leave_request(
        &mut conn,
        NewLeaveRequest {
            employee_id: e.id.clone(),
            leave_type: LeaveType::Unpaid,
            start_date: date(4, 2),
            end_date: date(4, 3),
            reason: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);
}

#[test]
fn test_started_leave_cannot_be_cancelled() {
    let (_tmp, mut conn) = setup_db();
    let e = employee(&conn, PayType::Salaried, date(1, 5));
    let req = ask(&mut conn, &e, LeaveType::Annual, (4, 1), (4, 3));
    leave::leave_approve(&mut conn, &req.id, "head of housekeeping").unwrap();

    let err = leave::leave_cancel(&conn, &req.id, date(4, 2)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);

    let cancelled = leave::leave_cancel(&conn, &req.id, date(3, 30)).unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
}

// ---------------------------------------------------------------------------
// payroll
// ---------------------------------------------------------------------------

#[test]
fn test_payroll_generate_and_pay() {
    let (_tmp, mut conn) = setup_db();
    let settings = HotelSettings::default();
    let salaried = employee(&conn, PayType::Salaried, date(1, 5));
    let hourly = employee(&conn, PayType::Hourly, date(1, 5));

    let unpaid = ask(&mut conn, &salaried, LeaveType::Unpaid, (4, 8), (4, 9));
    leave::leave_approve(&mut conn, &unpaid.id, "general manager").unwrap();
    attendance::attendance_record(
        &mut conn,
        NewAttendanceRecord {
            employee_id: hourly.id.clone(),
            clock_in: at(4, 6, 9),
            clock_out: at(4, 6, 19),
            notes: None,
        },
    )
    .unwrap();

    let run = payroll::payroll_generate(&mut conn, date(4, 1), date(4, 10), &settings).unwrap();
    assert_eq!(run.status, PayrollStatus::Draft);
    assert_eq!(run.payslips.len(), 2);

    let salaried_slip = run.payslips.iter().find(|p| p.employee_id == salaried.id).unwrap();
    assert_eq!(salaried_slip.base_pay_cents, 100_000);
    assert_eq!(salaried_slip.unpaid_leave_deduction_cents, 20_000);
    assert_eq!(salaried_slip.gross_cents, 80_000);

    let hourly_slip = run.payslips.iter().find(|p| p.employee_id == hourly.id).unwrap();
    assert_eq!(hourly_slip.base_pay_cents, 19_200);
    assert_eq!(hourly_slip.overtime_pay_cents, 7_200);
    assert_eq!(hourly_slip.gross_cents, 26_400);

    assert_eq!(run.total_gross_cents, 106_400);
    assert_eq!(run.total_deductions_cents, 15_960);
    assert_eq!(run.total_net_cents, 90_440);

    let paid = payroll::payroll_pay(&mut conn, &run.id, None, date(4, 11)).unwrap();
    assert_eq!(paid.status, PayrollStatus::Paid);
    assert!(paid.transaction_id.is_some());
    assert_eq!(balance(&conn, "5000"), 106_400);
    assert_eq!(balance(&conn, "2200"), 15_960);
    assert_eq!(balance(&conn, "1010"), -90_440);

    let err = payroll::payroll_pay(&mut conn, &run.id, None, date(4, 11)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
}

#[test]
fn test_regenerating_draft_replaces_it() {
    let (_tmp, mut conn) = setup_db();
    let settings = HotelSettings::default();
    employee(&conn, PayType::Salaried, date(1, 5));

    let first = payroll::payroll_generate(&mut conn, date(4, 1), date(4, 10), &settings).unwrap();
    let second = payroll::payroll_generate(&mut conn, date(4, 1), date(4, 10), &settings).unwrap();
    assert_ne!(first.id, second.id);

    let runs = payroll::payroll_list(&conn).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, second.id);

    let err = payroll::payroll_get(&conn, &first.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_paid_period_cannot_be_regenerated() {
    let (_tmp, mut conn) = setup_db();
    let settings = HotelSettings::default();
    employee(&conn, PayType::Salaried, date(1, 5));

    let run = payroll::payroll_generate(&mut conn, date(4, 1), date(4, 10), &settings).unwrap();
    payroll::payroll_pay(&mut conn, &run.id, None, date(4, 11)).unwrap();

    let err = payroll::payroll_generate(&mut conn, date(4, 5), date(4, 15), &settings).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);

    let err = payroll::payroll_delete(&conn, &run.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
}

#[test]
fn test_terminated_employee_paid_to_last_day() {
    let (_tmp, mut conn) = setup_db();
    let settings = HotelSettings::default();
    let leaver = employee(&conn, PayType::Salaried, date(1, 5));
    employees::employee_terminate(&conn, &leaver.id, date(4, 5)).unwrap();

    let run = payroll::payroll_generate(&mut conn, date(4, 1), date(4, 10), &settings).unwrap();
    assert_eq!(run.payslips.len(), 1);
    assert_eq!(run.payslips[0].base_pay_cents, 50_000);

    let later = payroll::payroll_generate(&mut conn, date(4, 11), date(4, 20), &settings).unwrap();
    assert!(later.payslips.is_empty());
}

// ---------------------------------------------------------------------------
// performance reviews
// ---------------------------------------------------------------------------

#[test]
fn test_review_summary_averages_ratings() {
    let (_tmp, conn) = setup_db();
    let e = employee(&conn, PayType::Salaried, date(1, 5));
    let manager = employee(&conn, PayType::Salaried, date(1, 5));

    for (rating, day) in [(4u8, 1u32), (3, 15)] {
        performance::review_create(
            &conn,
            NewReview {
                employee_id: e.id.clone(),
                reviewer_id: Some(manager.id.clone()),
                review_date: date(6, day),
                period_start: date(1, 1),
                period_end: date(5, 31),
                rating,
                strengths: None,
                improvements: None,
                goals: None,
                comments: None,
            },
        )
        .unwrap();
    }

    let summary = performance::performance_summary(&conn, &e.id).unwrap();
    assert_eq!(summary.review_count, 2);
    assert_eq!(summary.average_rating_hundredths, 350);
    assert_eq!(summary.latest_review_date, Some(date(6, 15)));
}

#[test]
fn test_review_needs_known_reviewer() {
    let (_tmp, conn) = setup_db();
    let e = employee(&conn, PayType::Salaried, date(1, 5));

    let err = performance::review_create(
        &conn,
        NewReview {
            employee_id: e.id.clone(),
            reviewer_id: Some("nobody".to_string()),
            review_date: date(6, 1),
            period_start: date(1, 1),
            period_end: date(5, 31),
            rating: 4,
            strengths: None,
            improvements: None,
            goals: None,
            comments: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
