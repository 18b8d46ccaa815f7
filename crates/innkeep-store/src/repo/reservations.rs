//! Reservations

use chrono::NaiveDate;
use innkeep_core::model::{Reservation, ReservationFilter, ReservationStatus};
use innkeep_core::reports::SoldStay;
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, opt_ts, query_all, query_opt, text_list, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const RESERVATION_COLUMNS: &str = "id, confirmation_code, guest_id, room_id, check_in, check_out, \
     adults, children, status, source, nightly_rate_cents, total_cents, special_requests, \
     invoice_id, checked_in_at, checked_out_at, cancelled_at, cancellation_reason, created_at, \
     updated_at";

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        confirmation_code: row.get(1)?,
        guest_id: row.get(2)?,
        room_id: row.get(3)?,
        check_in: row.get(4)?,
        check_out: row.get(5)?,
        adults: row.get(6)?,
        children: row.get(7)?,
        status: enum_col(row, 8)?,
        source: enum_col(row, 9)?,
        nightly_rate_cents: row.get(10)?,
        total_cents: row.get(11)?,
        special_requests: row.get(12)?,
        invoice_id: row.get(13)?,
        checked_in_at: opt_ts(row.get(14)?),
        checked_out_at: opt_ts(row.get(15)?),
        cancelled_at: opt_ts(row.get(16)?),
        cancellation_reason: row.get(17)?,
        created_at: ts(row.get(18)?),
        updated_at: ts(row.get(19)?),
    })
}

fn blocking_statuses() -> String {
    text_list(ReservationStatus::BLOCKING.iter().map(|s| s.as_str()))
}

impl SqliteRepo {
    pub fn insert_reservation(conn: &Connection, r: &Reservation) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO reservations ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                RESERVATION_COLUMNS
            ),
            params![
                r.id,
                r.confirmation_code,
                r.guest_id,
                r.room_id,
                r.check_in,
                r.check_out,
                r.adults,
                r.children,
                r.status.as_str(),
                r.source.as_str(),
                r.nightly_rate_cents,
                r.total_cents,
                r.special_requests,
                r.invoice_id,
                r.checked_in_at.map(|t| t.timestamp()),
                r.checked_out_at.map(|t| t.timestamp()),
                r.cancelled_at.map(|t| t.timestamp()),
                r.cancellation_reason,
                r.created_at.timestamp(),
                r.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_reservation(conn: &Connection, r: &Reservation) -> Result<()> {
        execute_one(
            conn,
            "UPDATE reservations SET room_id = ?2, check_in = ?3, check_out = ?4, adults = ?5,
                children = ?6, status = ?7, nightly_rate_cents = ?8, total_cents = ?9,
                special_requests = ?10, invoice_id = ?11, checked_in_at = ?12,
                checked_out_at = ?13, cancelled_at = ?14, cancellation_reason = ?15,
                updated_at = ?16
             WHERE id = ?1",
            params![
                r.id,
                r.room_id,
                r.check_in,
                r.check_out,
                r.adults,
                r.children,
                r.status.as_str(),
                r.nightly_rate_cents,
                r.total_cents,
                r.special_requests,
                r.invoice_id,
                r.checked_in_at.map(|t| t.timestamp()),
                r.checked_out_at.map(|t| t.timestamp()),
                r.cancelled_at.map(|t| t.timestamp()),
                r.cancellation_reason,
                r.updated_at.timestamp(),
            ],
            "reservation",
            &r.id,
        )
    }

    pub fn get_reservation(conn: &Connection, id: &str) -> Result<Option<Reservation>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM reservations WHERE id = ?1", RESERVATION_COLUMNS),
            [id],
            reservation_from_row,
        )
    }

    pub fn require_reservation(conn: &Connection, id: &str) -> Result<Reservation> {
        Self::get_reservation(conn, id)?.ok_or_else(|| not_found("reservation", id))
    }

    /// `from`/`to` select stays with at least one night inside `[from, to]`
    pub fn list_reservations(
        conn: &Connection,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM reservations
                 WHERE (?1 IS NULL OR status = ?1)
                   AND (?2 IS NULL OR guest_id = ?2)
                   AND (?3 IS NULL OR room_id = ?3)
                   AND (?4 IS NULL OR check_out > ?4)
                   AND (?5 IS NULL OR check_in <= ?5)
                 ORDER BY check_in, id",
                RESERVATION_COLUMNS
            ),
            params![
                filter.status.map(|s| s.as_str()),
                filter.guest_id,
                filter.room_id,
                filter.from,
                filter.to,
            ],
            reservation_from_row,
        )
    }

    /// A guest's reservations, newest stay first
    pub fn guest_reservations(conn: &Connection, guest_id: &str) -> Result<Vec<Reservation>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM reservations WHERE guest_id = ?1 ORDER BY check_in DESC, id DESC",
                RESERVATION_COLUMNS
            ),
            [guest_id],
            reservation_from_row,
        )
    }

    /// Confirmed reservations arriving on `date`
    pub fn arrivals(conn: &Connection, date: NaiveDate) -> Result<Vec<Reservation>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM reservations WHERE check_in = ?1 AND status = ?2 ORDER BY id",
                RESERVATION_COLUMNS
            ),
            params![date, ReservationStatus::Confirmed.as_str()],
            reservation_from_row,
        )
    }

    /// Checked-in reservations due out on `date`
    pub fn departures(conn: &Connection, date: NaiveDate) -> Result<Vec<Reservation>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM reservations WHERE check_out = ?1 AND status = ?2 ORDER BY id",
                RESERVATION_COLUMNS
            ),
            params![date, ReservationStatus::CheckedIn.as_str()],
            reservation_from_row,
        )
    }

    pub fn in_house(conn: &Connection) -> Result<Vec<Reservation>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM reservations WHERE status = ?1 ORDER BY check_out, id",
                RESERVATION_COLUMNS
            ),
            [ReservationStatus::CheckedIn.as_str()],
            reservation_from_row,
        )
    }

    /// First confirmed/checked-in reservation on the room intersecting the stay
    pub fn find_conflicting_reservation(
        conn: &Connection,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<Option<String>> {
        query_opt(
            conn,
            &format!(
                "SELECT id FROM reservations
                 WHERE room_id = ?1 AND status IN ({})
                   AND check_in < ?3 AND check_out > ?2
                   AND (?4 IS NULL OR id <> ?4)
                 ORDER BY check_in LIMIT 1",
                blocking_statuses()
            ),
            params![room_id, check_in, check_out, exclude_id],
            |row| row.get(0),
        )
    }

    pub fn count_active_reservations_for_room(conn: &Connection, room_id: &str) -> Result<i64> {
        count(
            conn,
            &format!(
                "SELECT COUNT(*) FROM reservations WHERE room_id = ?1 AND status IN ({})",
                blocking_statuses()
            ),
            [room_id],
        )
    }

    pub fn count_active_reservations_for_guest(conn: &Connection, guest_id: &str) -> Result<i64> {
        count(
            conn,
            &format!(
                "SELECT COUNT(*) FROM reservations WHERE guest_id = ?1 AND status IN ({})",
                blocking_statuses()
            ),
            [guest_id],
        )
    }

    /// Stays that were or will be sold, intersecting `[from, to]`
    pub fn sold_stays(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<Vec<SoldStay>> {
        query_all(
            conn,
            "SELECT check_in, check_out, nightly_rate_cents FROM reservations
             WHERE status NOT IN (?3, ?4) AND check_out > ?1 AND check_in <= ?2",
            params![
                from,
                to,
                ReservationStatus::Cancelled.as_str(),
                ReservationStatus::NoShow.as_str(),
            ],
            |row| {
                Ok(SoldStay {
                    check_in: row.get(0)?,
                    check_out: row.get(1)?,
                    nightly_rate_cents: row.get(2)?,
                })
            },
        )
    }
}
