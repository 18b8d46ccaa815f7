use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use innkeep_core::model::{
    Account, AccountFilter, AccountPatch, Budget, BudgetPatch, Expense, ExpenseCategorySummary,
    ExpenseFilter, ExpensePatch, ItemCategory, NewAccount, NewBudget, NewExpense, NewTaxRate,
    NewTransaction, TaxRate, TaxRatePatch, Transaction, TransactionFilter,
};
use innkeep_core::ops::{BudgetVariance, TaxBreakdown};
use innkeep_core::reports::AccountLedger;
use innkeep_engine::commands::{accounts, budgets, expenses, posting, tax};
use serde::Deserialize;

use super::{created, OnDate, ReasonBody};
use crate::error::ApiResult;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/:id/ledger", get(account_ledger))
        .route("/transactions", get(list_transactions).post(post_transaction))
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/:id/void", post(void_transaction))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/summary", get(expense_summary))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/:id/approve", post(approve_expense))
        .route("/expenses/:id/reject", post(reject_expense))
        .route("/expenses/:id/pay", post(pay_expense))
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/variance", get(budget_variance))
        .route(
            "/budgets/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/tax-rates", get(list_tax_rates).post(create_tax_rate))
        .route("/tax-rates/compute", post(compute_tax))
        .route(
            "/tax-rates/:id",
            get(get_tax_rate).put(update_tax_rate).delete(delete_tax_rate),
        )
}

#[derive(Debug, Default, Deserialize)]
struct LedgerRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ApproveBody {
    approved_by: String,
}

#[derive(Deserialize)]
struct RejectBody {
    reason: String,
}

#[derive(Debug, Default, Deserialize)]
struct PayBody {
    #[serde(default)]
    payment_account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VarianceQuery {
    budget_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TaxRateQuery {
    #[serde(default)]
    active_only: bool,
}

#[derive(Deserialize)]
struct ComputeBody {
    amount_cents: i64,
    category: ItemCategory,
}

// accounts

async fn list_accounts(
    State(state): State<AppState>,
    Query(filter): Query<AccountFilter>,
) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.with_conn(move |conn| accounts::account_list(conn, &filter)).await?))
}

async fn create_account(
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    Ok(created(state.with_conn(move |conn| accounts::account_create(conn, input)).await?))
}

async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Account>> {
    Ok(Json(state.with_conn(move |conn| accounts::account_get(conn, &id)).await?))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<AccountPatch>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.with_conn(move |conn| accounts::account_update(conn, &id, patch)).await?))
}

async fn delete_account(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| accounts::account_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn account_ledger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(range): Query<LedgerRange>,
) -> ApiResult<Json<AccountLedger>> {
    let ledger = state
        .with_conn(move |conn| accounts::account_ledger(conn, &id, range.from, range.to))
        .await?;
    Ok(Json(ledger))
}

// transactions

async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.with_conn(move |conn| posting::transaction_list(conn, &filter)).await?))
}

async fn post_transaction(
    State(state): State<AppState>,
    Json(input): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    Ok(created(state.with_conn(move |conn| posting::transaction_post(conn, input)).await?))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.with_conn(move |conn| posting::transaction_get(conn, &id)).await?))
}

async fn void_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.with_conn(move |conn| posting::transaction_void(conn, &id, body.reason)).await?))
}

// expenses

async fn list_expenses(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_list(conn, &filter)).await?))
}

async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    Ok(created(state.with_conn(move |conn| expenses::expense_create(conn, input)).await?))
}

async fn get_expense(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Expense>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_get(conn, &id)).await?))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ExpensePatch>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_update(conn, &id, patch)).await?))
}

async fn delete_expense(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| expenses::expense_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_approve(conn, &id, &body.approved_by)).await?))
}

async fn reject_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_reject(conn, &id, &body.reason)).await?))
}

async fn pay_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(on): Query<OnDate>,
    Json(body): Json<PayBody>,
) -> ApiResult<Json<Expense>> {
    let expense = state
        .with_conn(move |conn| {
            expenses::expense_pay(conn, &id, body.payment_account_id.as_deref(), on.date())
        })
        .await?;
    Ok(Json(expense))
}

async fn expense_summary(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<ExpenseCategorySummary>>> {
    Ok(Json(state.with_conn(move |conn| expenses::expense_summary(conn, &filter)).await?))
}

// budgets

async fn list_budgets(State(state): State<AppState>) -> ApiResult<Json<Vec<Budget>>> {
    Ok(Json(state.with_conn(move |conn| budgets::budget_list(conn)).await?))
}

async fn create_budget(
    State(state): State<AppState>,
    Json(input): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    Ok(created(state.with_conn(move |conn| budgets::budget_create(conn, input)).await?))
}

async fn get_budget(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Budget>> {
    Ok(Json(state.with_conn(move |conn| budgets::budget_get(conn, &id)).await?))
}

async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BudgetPatch>,
) -> ApiResult<Json<Budget>> {
    Ok(Json(state.with_conn(move |conn| budgets::budget_update(conn, &id, patch)).await?))
}

async fn delete_budget(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| budgets::budget_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn budget_variance(
    State(state): State<AppState>,
    Query(query): Query<VarianceQuery>,
) -> ApiResult<Json<Vec<BudgetVariance>>> {
    let rows = state
        .with_conn(move |conn| budgets::budget_variance(conn, query.budget_id.as_deref()))
        .await?;
    Ok(Json(rows))
}

// tax rates

async fn list_tax_rates(
    State(state): State<AppState>,
    Query(query): Query<TaxRateQuery>,
) -> ApiResult<Json<Vec<TaxRate>>> {
    Ok(Json(state.with_conn(move |conn| tax::tax_rate_list(conn, query.active_only)).await?))
}

async fn create_tax_rate(
    State(state): State<AppState>,
    Json(input): Json<NewTaxRate>,
) -> ApiResult<(StatusCode, Json<TaxRate>)> {
    Ok(created(state.with_conn(move |conn| tax::tax_rate_create(conn, input)).await?))
}

async fn get_tax_rate(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TaxRate>> {
    Ok(Json(state.with_conn(move |conn| tax::tax_rate_get(conn, &id)).await?))
}

async fn update_tax_rate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaxRatePatch>,
) -> ApiResult<Json<TaxRate>> {
    Ok(Json(state.with_conn(move |conn| tax::tax_rate_update(conn, &id, patch)).await?))
}

async fn delete_tax_rate(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.with_conn(move |conn| tax::tax_rate_delete(conn, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn compute_tax(
    State(state): State<AppState>,
    Json(body): Json<ComputeBody>,
) -> ApiResult<Json<TaxBreakdown>> {
    let breakdown = state
        .with_conn(move |conn| tax::tax_compute(conn, body.amount_cents, body.category))
        .await?;
    Ok(Json(breakdown))
}
