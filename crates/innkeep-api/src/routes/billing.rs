use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use innkeep_core::model::{Invoice, InvoiceFilter, NewInvoice, NewInvoiceItem, NewPayment};
use innkeep_engine::commands::billing::{self, OutstandingSummary};

use super::{created, OnDate, ReasonBody};
use crate::error::ApiResult;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/outstanding", get(outstanding))
        .route("/invoices/:id", get(get_invoice))
        .route("/invoices/:id/items", post(add_item))
        .route("/invoices/:id/items/:item_id", delete(remove_item))
        .route("/invoices/:id/payments", post(record_payment))
        .route("/invoices/:id/void", post(void_invoice))
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(state.with_conn(move |conn| billing::invoice_list(conn, &filter)).await?))
}

async fn create_invoice(
    State(state): State<AppState>,
    Query(on): Query<OnDate>,
    Json(input): Json<NewInvoice>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    Ok(created(state.with_conn(move |conn| billing::invoice_create(conn, input, on.date())).await?))
}

async fn get_invoice(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.with_conn(move |conn| billing::invoice_get(conn, &id)).await?))
}

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
    Json(input): Json<NewInvoiceItem>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    Ok(created(state.with_conn(move |conn| billing::invoice_add_item(conn, &id, input, on.date())).await?))
}

async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.with_conn(move |conn| billing::invoice_remove_item(conn, &id, &item_id)).await?))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
    Json(input): Json<NewPayment>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let invoice = state
        .with_conn(move |conn| billing::invoice_record_payment(conn, &id, input, on.date()))
        .await?;
    Ok(created(invoice))
}

async fn void_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.with_conn(move |conn| billing::invoice_void(conn, &id, body.reason)).await?))
}

async fn outstanding(State(state): State<AppState>) -> ApiResult<Json<OutstandingSummary>> {
    Ok(Json(state.with_conn(move |conn| billing::invoice_outstanding(conn)).await?))
}
