use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use innkeep_core::model::{
    AttendanceFilter, AttendanceRecord, Employee, EmployeeFilter, EmployeePatch, LeaveFilter,
    LeaveRequest, NewAttendanceRecord, NewEmployee, NewLeaveRequest, NewReview, PayrollRun,
    PerformanceReview, ReviewPatch,
};
use innkeep_core::ops::{AttendanceSummary, LeaveBalance, PerformanceSummary};
use innkeep_engine::commands::{attendance, employees, leave, payroll, performance};
use serde::Deserialize;

use super::{created, OnDate, Period};
use crate::error::ApiResult;
use crate::state::{today, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee).put(update_employee))
        .route("/employees/:id/terminate", post(terminate_employee))
        .route("/employees/:id/leave-balance", get(leave_balance))
        .route("/employees/:id/attendance-summary", get(attendance_summary))
        .route("/employees/:id/performance-summary", get(performance_summary))
        .route("/attendance", get(list_attendance).post(record_attendance))
        .route("/attendance/clock-in", post(clock_in))
        .route("/attendance/clock-out", post(clock_out))
        .route("/leave-requests", get(list_leave).post(request_leave))
        .route("/leave-requests/:id", get(get_leave))
        .route("/leave-requests/:id/approve", post(approve_leave))
        .route("/leave-requests/:id/reject", post(reject_leave))
        .route("/leave-requests/:id/cancel", post(cancel_leave))
        .route("/payroll/runs", get(list_payroll_runs).post(generate_payroll))
        .route(
            "/payroll/runs/:id",
            get(get_payroll_run).delete(delete_payroll_run),
        )
        .route("/payroll/runs/:id/pay", post(pay_payroll_run))
        .route("/performance-reviews", get(list_reviews).post(create_review))
        .route(
            "/performance-reviews/:id",
            get(get_review).put(update_review).delete(delete_review),
        )
}

#[derive(Debug, Default, Deserialize)]
struct TerminateBody {
    on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

#[derive(Deserialize)]
struct ClockInBody {
    employee_id: String,
    at: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Deserialize)]
struct ClockOutBody {
    employee_id: String,
    at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ApproveBody {
    reviewer: String,
}

#[derive(Deserialize)]
struct RejectBody {
    reviewer: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PayBody {
    #[serde(default)]
    payment_account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReviewQuery {
    employee_id: Option<String>,
}

// employees

async fn list_employees(
    State(state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.with_conn(move |conn| employees::employee_list(conn, &filter)).await?))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<NewEmployee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    Ok(created(state.with_conn(move |conn| employees::employee_create(conn, input)).await?))
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Employee>> {
    Ok(Json(state.with_conn(move |conn| employees::employee_get(conn, &id)).await?))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EmployeePatch>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.with_conn(move |conn| employees::employee_update(conn, &id, patch)).await?))
}

async fn terminate_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TerminateBody>,
) -> ApiResult<Json<Employee>> {
    let on = body.on.unwrap_or_else(today);
    Ok(Json(state.with_conn(move |conn| employees::employee_terminate(conn, &id, on)).await?))
}

async fn leave_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<LeaveBalance>> {
    let year = query.year.unwrap_or_else(|| today().year());
    Ok(Json(state.with_conn(move |conn| leave::leave_balance(conn, &id, year)).await?))
}

async fn attendance_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(period): Query<Period>,
) -> ApiResult<Json<AttendanceSummary>> {
    let settings = state.settings.clone();
    let summary = state
        .with_conn(move |conn| {
            attendance::attendance_summary(conn, &id, period.from, period.to, &settings)
        })
        .await?;
    Ok(Json(summary))
}

async fn performance_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PerformanceSummary>> {
    Ok(Json(state.with_conn(move |conn| performance::performance_summary(conn, &id)).await?))
}

// attendance

async fn list_attendance(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    Ok(Json(state.with_conn(move |conn| attendance::attendance_list(conn, &filter)).await?))
}

async fn record_attendance(
    State(state): State<AppState>,
    Json(input): Json<NewAttendanceRecord>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    Ok(created(state.with_conn(move |conn| attendance::attendance_record(conn, input)).await?))
}

async fn clock_in(
    State(state): State<AppState>,
    Json(body): Json<ClockInBody>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let at = body.at.unwrap_or_else(Utc::now);
    let record = state
        .with_conn(move |conn| attendance::clock_in(conn, &body.employee_id, at, body.notes))
        .await?;
    Ok(created(record))
}

async fn clock_out(
    State(state): State<AppState>,
    Json(body): Json<ClockOutBody>,
) -> ApiResult<Json<AttendanceRecord>> {
    let at = body.at.unwrap_or_else(Utc::now);
    Ok(Json(state.with_conn(move |conn| attendance::clock_out(conn, &body.employee_id, at)).await?))
}

// leave

async fn list_leave(
    State(state): State<AppState>,
    Query(filter): Query<LeaveFilter>,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    Ok(Json(state.with_conn(move |conn| leave::leave_list(conn, &filter)).await?))
}

async fn request_leave(
    State(state): State<AppState>,
    Json(input): Json<NewLeaveRequest>,
) -> ApiResult<(StatusCode, Json<LeaveRequest>)> {
    Ok(created(state.with_conn(move |conn| leave::leave_request(conn, input)).await?))
}

async fn get_leave(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<LeaveRequest>> {
    Ok(Json(state.with_conn(move |conn| leave::leave_get(conn, &id)).await?))
}

async fn approve_leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> ApiResult<Json<LeaveRequest>> {
    Ok(Json(state.with_conn(move |conn| leave::leave_approve(conn, &id, &body.reviewer)).await?))
}

async fn reject_leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<LeaveRequest>> {
    Ok(Json(state.with_conn(move |conn| leave::leave_reject(conn, &id, &body.reviewer, body.note)).await?))
}

async fn cancel_leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
) -> ApiResult<Json<LeaveRequest>> {
    Ok(Json(state.with_conn(move |conn| leave::leave_cancel(conn, &id, on.date())).await?))
}

// payroll

async fn list_payroll_runs(State(state): State<AppState>) -> ApiResult<Json<Vec<PayrollRun>>> {
    Ok(Json(state.with_conn(move |conn| payroll::payroll_list(conn)).await?))
}

async fn generate_payroll(
    State(state): State<AppState>,
    Json(period): Json<Period>,
) -> ApiResult<(StatusCode, Json<PayrollRun>)> {
    let settings = state.settings.clone();
    let run = state
        .with_conn(move |conn| payroll::payroll_generate(conn, period.from, period.to, &settings))
        .await?;
    Ok(created(run))
}

async fn get_payroll_run(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<PayrollRun>> {
    Ok(Json(state.with_conn(move |conn| payroll::payroll_get(conn, &id)).await?))
}

async fn delete_payroll_run(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| payroll::payroll_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pay_payroll_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
    Json(body): Json<PayBody>,
) -> ApiResult<Json<PayrollRun>> {
    let run = state
        .with_conn(move |conn| {
            payroll::payroll_pay(conn, &id, body.payment_account_id.as_deref(), on.date())
        })
        .await?;
    Ok(Json(run))
}

// performance reviews

async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Json<Vec<PerformanceReview>>> {
    Ok(Json(state.with_conn(move |conn| performance::review_list(conn, query.employee_id.as_deref())).await?))
}

async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<PerformanceReview>)> {
    Ok(created(state.with_conn(move |conn| performance::review_create(conn, input)).await?))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PerformanceReview>> {
    Ok(Json(state.with_conn(move |conn| performance::review_get(conn, &id)).await?))
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReviewPatch>,
) -> ApiResult<Json<PerformanceReview>> {
    Ok(Json(state.with_conn(move |conn| performance::review_update(conn, &id, patch)).await?))
}

async fn delete_review(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| performance::review_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
