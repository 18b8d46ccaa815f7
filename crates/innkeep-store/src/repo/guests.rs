//! Guests

use innkeep_core::model::{Guest, GuestFilter};
use rusqlite::{params, Connection, Row};

use super::rows::{execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const GUEST_COLUMNS: &str = "id, first_name, last_name, email, phone, address, id_document, \
                             nationality, vip, notes, created_at, updated_at";

fn guest_from_row(row: &Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        id_document: row.get(6)?,
        nationality: row.get(7)?,
        vip: row.get(8)?,
        notes: row.get(9)?,
        created_at: ts(row.get(10)?),
        updated_at: ts(row.get(11)?),
    })
}

impl SqliteRepo {
    pub fn insert_guest(conn: &Connection, guest: &Guest) -> Result<()> {
        conn.execute(
            "INSERT INTO guests (id, first_name, last_name, email, phone, address, id_document,
                nationality, vip, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                guest.id,
                guest.first_name,
                guest.last_name,
                guest.email,
                guest.phone,
                guest.address,
                guest.id_document,
                guest.nationality,
                guest.vip,
                guest.notes,
                guest.created_at.timestamp(),
                guest.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_guest(conn: &Connection, guest: &Guest) -> Result<()> {
        execute_one(
            conn,
            "UPDATE guests SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5, address = ?6,
                id_document = ?7, nationality = ?8, vip = ?9, notes = ?10, updated_at = ?11
             WHERE id = ?1",
            params![
                guest.id,
                guest.first_name,
                guest.last_name,
                guest.email,
                guest.phone,
                guest.address,
                guest.id_document,
                guest.nationality,
                guest.vip,
                guest.notes,
                guest.updated_at.timestamp(),
            ],
            "guest",
            &guest.id,
        )
    }

    pub fn get_guest(conn: &Connection, id: &str) -> Result<Option<Guest>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM guests WHERE id = ?1", GUEST_COLUMNS),
            [id],
            guest_from_row,
        )
    }

    pub fn require_guest(conn: &Connection, id: &str) -> Result<Guest> {
        Self::get_guest(conn, id)?.ok_or_else(|| not_found("guest", id))
    }

    /// Free-text `q` matches name, email or phone, case-insensitively
    pub fn list_guests(conn: &Connection, filter: &GuestFilter) -> Result<Vec<Guest>> {
        let pattern = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q.to_lowercase()));
        query_all(
            conn,
            &format!(
                "SELECT {} FROM guests
                 WHERE ?1 IS NULL
                    OR lower(first_name || ' ' || last_name) LIKE ?1
                    OR lower(coalesce(email, '')) LIKE ?1
                    OR coalesce(phone, '') LIKE ?1
                 ORDER BY last_name, first_name",
                GUEST_COLUMNS
            ),
            [pattern],
            guest_from_row,
        )
    }

    pub fn delete_guest(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM guests WHERE id = ?1", [id], "guest", id)
    }
}
