//! Expenses

use innkeep_core::model::{Expense, ExpenseCategorySummary, ExpenseFilter, ExpenseStatus};
use rusqlite::{params, Connection, Row};

use super::rows::{enum_col, execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const EXPENSE_COLUMNS: &str = "id, category, description, vendor, amount_cents, expense_date, \
     account_id, status, payment_account_id, transaction_id, approved_by, rejection_reason, \
     created_at, updated_at";

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        description: row.get(2)?,
        vendor: row.get(3)?,
        amount_cents: row.get(4)?,
        expense_date: row.get(5)?,
        account_id: row.get(6)?,
        status: enum_col(row, 7)?,
        payment_account_id: row.get(8)?,
        transaction_id: row.get(9)?,
        approved_by: row.get(10)?,
        rejection_reason: row.get(11)?,
        created_at: ts(row.get(12)?),
        updated_at: ts(row.get(13)?),
    })
}

impl SqliteRepo {
    pub fn insert_expense(conn: &Connection, e: &Expense) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO expenses ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                EXPENSE_COLUMNS
            ),
            params![
                e.id,
                e.category,
                e.description,
                e.vendor,
                e.amount_cents,
                e.expense_date,
                e.account_id,
                e.status.as_str(),
                e.payment_account_id,
                e.transaction_id,
                e.approved_by,
                e.rejection_reason,
                e.created_at.timestamp(),
                e.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_expense(conn: &Connection, e: &Expense) -> Result<()> {
        execute_one(
            conn,
            "UPDATE expenses SET category = ?2, description = ?3, vendor = ?4, amount_cents = ?5,
                expense_date = ?6, account_id = ?7, status = ?8, payment_account_id = ?9,
                transaction_id = ?10, approved_by = ?11, rejection_reason = ?12, updated_at = ?13
             WHERE id = ?1",
            params![
                e.id,
                e.category,
                e.description,
                e.vendor,
                e.amount_cents,
                e.expense_date,
                e.account_id,
                e.status.as_str(),
                e.payment_account_id,
                e.transaction_id,
                e.approved_by,
                e.rejection_reason,
                e.updated_at.timestamp(),
            ],
            "expense",
            &e.id,
        )
    }

    pub fn get_expense(conn: &Connection, id: &str) -> Result<Option<Expense>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS),
            [id],
            expense_from_row,
        )
    }

    pub fn require_expense(conn: &Connection, id: &str) -> Result<Expense> {
        Self::get_expense(conn, id)?.ok_or_else(|| not_found("expense", id))
    }

    pub fn list_expenses(conn: &Connection, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM expenses
                 WHERE (?1 IS NULL OR status = ?1)
                   AND (?2 IS NULL OR category = ?2)
                   AND (?3 IS NULL OR expense_date >= ?3)
                   AND (?4 IS NULL OR expense_date <= ?4)
                 ORDER BY expense_date, id",
                EXPENSE_COLUMNS
            ),
            params![
                filter.status.map(|s| s.as_str()),
                filter.category,
                filter.from,
                filter.to,
            ],
            expense_from_row,
        )
    }

    pub fn delete_expense(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM expenses WHERE id = ?1", [id], "expense", id)
    }

    /// Totals per category over the same filter as `list_expenses`,
    /// rejected expenses excluded
    pub fn expense_summary(
        conn: &Connection,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseCategorySummary>> {
        query_all(
            conn,
            "SELECT category, COUNT(*), SUM(amount_cents),
                    COALESCE(SUM(CASE WHEN status = ?6 THEN amount_cents END), 0)
             FROM expenses
             WHERE status <> ?5
               AND (?1 IS NULL OR status = ?1)
               AND (?2 IS NULL OR category = ?2)
               AND (?3 IS NULL OR expense_date >= ?3)
               AND (?4 IS NULL OR expense_date <= ?4)
             GROUP BY category
             ORDER BY category",
            params![
                filter.status.map(|s| s.as_str()),
                filter.category,
                filter.from,
                filter.to,
                ExpenseStatus::Rejected.as_str(),
                ExpenseStatus::Paid.as_str(),
            ],
            |row| {
                Ok(ExpenseCategorySummary {
                    category: row.get(0)?,
                    count: row.get(1)?,
                    amount_cents: row.get(2)?,
                    paid_cents: row.get(3)?,
                })
            },
        )
    }
}
