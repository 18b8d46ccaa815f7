use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use innkeep_core::model::{HousekeepingTask, NewTask, TaskFilter};
use innkeep_engine::commands::housekeeping;
use serde::Deserialize;

use super::{created, OnDate};
use crate::error::ApiResult;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/housekeeping/tasks", get(list_tasks).post(create_task))
        .route("/housekeeping/tasks/:id", get(get_task))
        .route("/housekeeping/tasks/:id/assign", post(assign_task))
        .route("/housekeeping/tasks/:id/start", post(start_task))
        .route("/housekeeping/tasks/:id/complete", post(complete_task))
        .route("/housekeeping/tasks/:id/cancel", post(cancel_task))
}

#[derive(Deserialize)]
struct AssignBody {
    employee_id: String,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<HousekeepingTask>>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_list(conn, &filter)).await?))
}

async fn create_task(
    State(state): State<AppState>,
    Query(on): Query<OnDate>,
    Json(input): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<HousekeepingTask>)> {
    Ok(created(state.with_conn(move |conn| housekeeping::task_create(conn, input, on.date())).await?))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTask>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_get(conn, &id)).await?))
}

async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AssignBody>,
) -> ApiResult<Json<HousekeepingTask>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_assign(conn, &id, &body.employee_id)).await?))
}

async fn start_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTask>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_start(conn, &id)).await?))
}

async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTask>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_complete(conn, &id)).await?))
}

async fn cancel_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTask>> {
    Ok(Json(state.with_conn(move |conn| housekeeping::task_cancel(conn, &id)).await?))
}
