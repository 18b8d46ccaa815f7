//! Tax rates

use innkeep_core::model::TaxRate;
use rusqlite::{params, Connection, Row};

use super::rows::{execute_one, opt_enum_col, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const TAX_COLUMNS: &str = "id, name, rate_bp, applies_to, is_active, created_at, updated_at";

fn tax_rate_from_row(row: &Row<'_>) -> rusqlite::Result<TaxRate> {
    Ok(TaxRate {
        id: row.get(0)?,
        name: row.get(1)?,
        rate_bp: row.get(2)?,
        applies_to: opt_enum_col(row, 3)?,
        is_active: row.get(4)?,
        created_at: ts(row.get(5)?),
        updated_at: ts(row.get(6)?),
    })
}

impl SqliteRepo {
    pub fn insert_tax_rate(conn: &Connection, rate: &TaxRate) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO tax_rates ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                TAX_COLUMNS
            ),
            params![
                rate.id,
                rate.name,
                rate.rate_bp,
                rate.applies_to.map(|c| c.as_str()),
                rate.is_active,
                rate.created_at.timestamp(),
                rate.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_tax_rate(conn: &Connection, rate: &TaxRate) -> Result<()> {
        execute_one(
            conn,
            "UPDATE tax_rates SET name = ?2, rate_bp = ?3, applies_to = ?4, is_active = ?5,
                updated_at = ?6
             WHERE id = ?1",
            params![
                rate.id,
                rate.name,
                rate.rate_bp,
                rate.applies_to.map(|c| c.as_str()),
                rate.is_active,
                rate.updated_at.timestamp(),
            ],
            "tax rate",
            &rate.id,
        )
    }

    pub fn get_tax_rate(conn: &Connection, id: &str) -> Result<Option<TaxRate>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM tax_rates WHERE id = ?1", TAX_COLUMNS),
            [id],
            tax_rate_from_row,
        )
    }

    pub fn require_tax_rate(conn: &Connection, id: &str) -> Result<TaxRate> {
        Self::get_tax_rate(conn, id)?.ok_or_else(|| not_found("tax rate", id))
    }

    pub fn list_tax_rates(conn: &Connection, active_only: bool) -> Result<Vec<TaxRate>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM tax_rates WHERE (?1 = 0 OR is_active = 1) ORDER BY name",
                TAX_COLUMNS
            ),
            [active_only],
            tax_rate_from_row,
        )
    }

    pub fn delete_tax_rate(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM tax_rates WHERE id = ?1", [id], "tax rate", id)
    }
}
