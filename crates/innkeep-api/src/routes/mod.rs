//! REST routes under `/api/v1`
//!
//! Handlers are thin: extract, call one engine command inside
//! `AppState::with_conn`, wrap the result. Creation answers `201`,
//! deletion `204`. Commands that depend on the business date accept
//! `?on=YYYY-MM-DD` and otherwise use today's UTC date.

mod accounting;
mod billing;
mod front_office;
mod housekeeping;
mod reports;
mod staff;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::state::{today, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(front_office::routes())
        .merge(billing::routes())
        .merge(housekeeping::routes())
        .merge(accounting::routes())
        .merge(reports::routes())
        .merge(staff::routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `?on=` business date override
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OnDate {
    pub on: Option<NaiveDate>,
}

impl OnDate {
    pub fn date(&self) -> NaiveDate {
        self.on.unwrap_or_else(today)
    }
}

/// `?from=&to=` reporting window
#[derive(Debug, Deserialize)]
pub(crate) struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReasonBody {
    #[serde(default)]
    pub reason: Option<String>,
}

pub(crate) fn created<T>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}
