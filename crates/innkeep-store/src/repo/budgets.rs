//! Budgets

use innkeep_core::model::Budget;
use rusqlite::{params, Connection, Row};

use super::rows::{execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const BUDGET_COLUMNS: &str = "id, name, account_id, period_start, period_end, amount_cents, notes, \
                              created_at, updated_at";

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        name: row.get(1)?,
        account_id: row.get(2)?,
        period_start: row.get(3)?,
        period_end: row.get(4)?,
        amount_cents: row.get(5)?,
        notes: row.get(6)?,
        created_at: ts(row.get(7)?),
        updated_at: ts(row.get(8)?),
    })
}

impl SqliteRepo {
    pub fn insert_budget(conn: &Connection, b: &Budget) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO budgets ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                BUDGET_COLUMNS
            ),
            params![
                b.id,
                b.name,
                b.account_id,
                b.period_start,
                b.period_end,
                b.amount_cents,
                b.notes,
                b.created_at.timestamp(),
                b.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_budget(conn: &Connection, b: &Budget) -> Result<()> {
        execute_one(
            conn,
            "UPDATE budgets SET name = ?2, account_id = ?3, period_start = ?4, period_end = ?5,
                amount_cents = ?6, notes = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                b.id,
                b.name,
                b.account_id,
                b.period_start,
                b.period_end,
                b.amount_cents,
                b.notes,
                b.updated_at.timestamp(),
            ],
            "budget",
            &b.id,
        )
    }

    pub fn get_budget(conn: &Connection, id: &str) -> Result<Option<Budget>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM budgets WHERE id = ?1", BUDGET_COLUMNS),
            [id],
            budget_from_row,
        )
    }

    pub fn require_budget(conn: &Connection, id: &str) -> Result<Budget> {
        Self::get_budget(conn, id)?.ok_or_else(|| not_found("budget", id))
    }

    pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM budgets ORDER BY period_start, name",
                BUDGET_COLUMNS
            ),
            [],
            budget_from_row,
        )
    }

    pub fn delete_budget(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM budgets WHERE id = ?1", [id], "budget", id)
    }
}
