//! Expense approval workflow and payment posting

use chrono::NaiveDate;
use innkeep_core::model::{
    new_id, AccountType, Expense, ExpenseCategorySummary, ExpenseFilter, ExpensePatch,
    ExpenseStatus, NewExpense, NewJournalLine, NewTransaction, TransactionSource,
};
use innkeep_core::rules::validation::require_status;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::posting::{asset_account, post_in};
use super::{begin, commit};
use crate::Result;

const CASH_ON_HAND: &str = "1000";

fn check_expense_account(conn: &Connection, account_id: &str) -> Result<()> {
    let account = SqliteRepo::require_account(conn, account_id)?;
    account.require_type(&[AccountType::Expense])?;
    account.require_active()?;
    Ok(())
}

pub fn expense_create(conn: &Connection, input: NewExpense) -> Result<Expense> {
    logged!("expense_create", {
        let expense = Expense::create(new_id(), input)?;
        check_expense_account(conn, &expense.account_id)?;
        SqliteRepo::insert_expense(conn, &expense)?;
        Ok(expense)
    })
}

pub fn expense_update(conn: &Connection, id: &str, patch: ExpensePatch) -> Result<Expense> {
    logged!("expense_update", expense_id = id; {
        let mut expense = SqliteRepo::require_expense(conn, id)?;
        let account_changed = patch.account_id.is_some();
        expense.apply(patch)?;
        if account_changed {
            check_expense_account(conn, &expense.account_id)?;
        }
        SqliteRepo::update_expense(conn, &expense)?;
        Ok(expense)
    })
}

pub fn expense_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("expense_delete", expense_id = id; {
        SqliteRepo::require_expense(conn, id)?.ensure_pending("delete")?;
        SqliteRepo::delete_expense(conn, id)
    })
}

pub fn expense_approve(conn: &Connection, id: &str, approver: &str) -> Result<Expense> {
    logged!("expense_approve", expense_id = id; {
        let mut expense = SqliteRepo::require_expense(conn, id)?;
        expense.approve(approver)?;
        SqliteRepo::update_expense(conn, &expense)?;
        Ok(expense)
    })
}

pub fn expense_reject(conn: &Connection, id: &str, reason: &str) -> Result<Expense> {
    logged!("expense_reject", expense_id = id; {
        let mut expense = SqliteRepo::require_expense(conn, id)?;
        expense.reject(reason)?;
        SqliteRepo::update_expense(conn, &expense)?;
        Ok(expense)
    })
}

/// Pay an approved expense from an asset account, Cash on Hand by default
pub fn expense_pay(
    conn: &mut Connection,
    id: &str,
    payment_account_id: Option<&str>,
    today: NaiveDate,
) -> Result<Expense> {
    logged!("expense_pay", expense_id = id; {
        let tx = begin(conn)?;
        let mut expense = SqliteRepo::require_expense(&tx, id)?;
        require_status("expense", &expense.id, expense.status, &[ExpenseStatus::Approved], "pay")?;
        let paid_from = asset_account(&tx, payment_account_id, CASH_ON_HAND)?;

        let description = match &expense.vendor {
            Some(vendor) => format!("{} ({})", expense.description, vendor),
            None => expense.description.clone(),
        };
        let txn = post_in(
            &tx,
            &NewTransaction::system(
                today,
                description,
                TransactionSource::Expense,
                expense.id.clone(),
                vec![
                    NewJournalLine::debit(expense.account_id.clone(), expense.amount_cents),
                    NewJournalLine::credit(paid_from.id.clone(), expense.amount_cents),
                ],
            ),
        )?;
        expense.mark_paid(&paid_from.id, &txn.id)?;
        SqliteRepo::update_expense(&tx, &expense)?;
        commit(tx)?;
        Ok(expense)
    })
}

pub fn expense_get(conn: &Connection, id: &str) -> Result<Expense> {
    logged!("expense_get", { SqliteRepo::require_expense(conn, id) })
}

pub fn expense_list(conn: &Connection, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
    logged!("expense_list", { SqliteRepo::list_expenses(conn, filter) })
}

/// Totals per category, rejected expenses left out
pub fn expense_summary(
    conn: &Connection,
    filter: &ExpenseFilter,
) -> Result<Vec<ExpenseCategorySummary>> {
    logged!("expense_summary", { SqliteRepo::expense_summary(conn, filter) })
}
