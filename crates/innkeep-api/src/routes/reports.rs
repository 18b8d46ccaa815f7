use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use innkeep_core::reports::{
    BalanceSheet, Dashboard, IncomeStatement, OccupancyReport, RevenueByCategory, TaxReport,
    TrialBalance,
};
use innkeep_engine::commands::{reports, tax};
use serde::Deserialize;

use super::{OnDate, Period};
use crate::error::ApiResult;
use crate::state::{today, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/income-statement", get(income_statement))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/occupancy", get(occupancy))
        .route("/reports/revenue-by-category", get(revenue_by_category))
        .route("/reports/tax", get(tax_report))
        .route("/reports/dashboard", get(dashboard))
}

/// `?as_of=`, defaulting to today
#[derive(Debug, Default, Deserialize)]
struct AsOf {
    as_of: Option<NaiveDate>,
}

impl AsOf {
    fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(today)
    }
}

async fn trial_balance(
    State(state): State<AppState>,
    Query(query): Query<AsOf>,
) -> ApiResult<Json<TrialBalance>> {
    Ok(Json(state.with_conn(move |conn| reports::trial_balance(conn, query.date())).await?))
}

async fn income_statement(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<Json<IncomeStatement>> {
    Ok(Json(state.with_conn(move |conn| reports::income_statement(conn, period.from, period.to)).await?))
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<AsOf>,
) -> ApiResult<Json<BalanceSheet>> {
    Ok(Json(state.with_conn(move |conn| reports::balance_sheet(conn, query.date())).await?))
}

async fn occupancy(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<Json<OccupancyReport>> {
    Ok(Json(state.with_conn(move |conn| reports::occupancy(conn, period.from, period.to)).await?))
}

async fn revenue_by_category(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<Json<RevenueByCategory>> {
    let report = state
        .with_conn(move |conn| reports::revenue_by_category(conn, period.from, period.to))
        .await?;
    Ok(Json(report))
}

async fn tax_report(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<Json<TaxReport>> {
    Ok(Json(state.with_conn(move |conn| tax::tax_report(conn, period.from, period.to)).await?))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(on): Query<OnDate>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.with_conn(move |conn| reports::dashboard(conn, on.date())).await?))
}
