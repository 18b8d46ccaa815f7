//! Booking lifecycle: create, modify, check-in, check-out, cancel, no-show
//!
//! Check-in opens the guest's invoice and occupies the room. Check-out
//! bills the stay through the same path as any other invoice line, so the
//! room revenue posting rides in the check-out SQL transaction, then hands
//! the room to housekeeping.

use chrono::{NaiveDate, Utc};
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{
    confirmation_code, new_id, HousekeepingTask, Invoice, ItemCategory, NewInvoice,
    NewInvoiceItem, NewReservation, NewTask, Reservation, ReservationFilter, ReservationPatch,
    Room, RoomStatus, RoomType, TaskPriority, TaskType,
};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;
use serde::Serialize;

use super::billing::{add_item_in, open_invoice_in};
use super::{begin, commit, insert_with_fresh_reference};
use crate::Result;

/// Everything check-out touched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutSummary {
    pub reservation: Reservation,
    pub invoice: Invoice,
    pub housekeeping_task: HousekeepingTask,
}

fn unavailable(r: &Reservation) -> InnkeepError {
    InnkeepError::RoomUnavailable {
        room_id: r.room_id.clone(),
        check_in: r.check_in.to_string(),
        check_out: r.check_out.to_string(),
    }
}

/// Room not out of order, party fits, no other stay on the room intersects
fn ensure_bookable(
    conn: &Connection,
    r: &Reservation,
    room: &Room,
    room_type: &RoomType,
    exclude_id: Option<&str>,
) -> Result<()> {
    if room.status == RoomStatus::OutOfOrder {
        return Err(unavailable(r).into());
    }
    let party = r.party_size()?;
    if party > room_type.capacity {
        return Err(InnkeepError::CapacityExceeded {
            room_id: room.id.clone(),
            capacity: room_type.capacity,
            requested: party,
        }
        .into());
    }
    let conflict = SqliteRepo::find_conflicting_reservation(
        conn,
        &room.id,
        r.check_in,
        r.check_out,
        exclude_id,
    )?;
    if let Some(other) = conflict {
        tracing::debug!(room_id = %room.id, conflicting = %other, "stay overlaps");
        return Err(unavailable(r).into());
    }
    Ok(())
}

fn room_and_type(conn: &Connection, room_id: &str) -> Result<(Room, RoomType)> {
    let room = SqliteRepo::require_room(conn, room_id)?;
    let room_type = SqliteRepo::require_room_type(conn, &room.room_type_id)?;
    Ok((room, room_type))
}

/// Book a room; the nightly rate defaults to the room type's base rate
pub fn reservation_create(conn: &mut Connection, input: NewReservation) -> Result<Reservation> {
    logged!("reservation_create", {
        let tx = begin(conn)?;
        SqliteRepo::require_guest(&tx, &input.guest_id)?;
        let (room, room_type) = room_and_type(&tx, &input.room_id)?;
        let rate = input.nightly_rate_cents.unwrap_or(room_type.base_rate_cents);
        let mut reservation = Reservation::create(new_id(), confirmation_code(), input, rate)?;
        ensure_bookable(&tx, &reservation, &room, &room_type, None)?;
        insert_with_fresh_reference(
            &mut reservation,
            |r| r.confirmation_code = confirmation_code(),
            |r| SqliteRepo::insert_reservation(&tx, r),
        )?;
        commit(tx)?;
        Ok(reservation)
    })
}

pub fn reservation_update(
    conn: &mut Connection,
    id: &str,
    patch: ReservationPatch,
) -> Result<Reservation> {
    logged!("reservation_update", reservation_id = id; {
        let tx = begin(conn)?;
        let mut reservation = SqliteRepo::require_reservation(&tx, id)?;
        reservation.apply(patch)?;
        let (room, room_type) = room_and_type(&tx, &reservation.room_id)?;
        ensure_bookable(&tx, &reservation, &room, &room_type, Some(id))?;
        SqliteRepo::update_reservation(&tx, &reservation)?;
        commit(tx)?;
        Ok(reservation)
    })
}

pub fn reservation_get(conn: &Connection, id: &str) -> Result<Reservation> {
    logged!("reservation_get", { SqliteRepo::require_reservation(conn, id) })
}

pub fn reservation_list(conn: &Connection, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
    logged!("reservation_list", { SqliteRepo::list_reservations(conn, filter) })
}

/// Confirmed stays arriving on `date`
pub fn reservation_arrivals(conn: &Connection, date: NaiveDate) -> Result<Vec<Reservation>> {
    logged!("reservation_arrivals", { SqliteRepo::arrivals(conn, date) })
}

/// Checked-in stays due out on `date`
pub fn reservation_departures(conn: &Connection, date: NaiveDate) -> Result<Vec<Reservation>> {
    logged!("reservation_departures", { SqliteRepo::departures(conn, date) })
}

pub fn reservation_in_house(conn: &Connection) -> Result<Vec<Reservation>> {
    logged!("reservation_in_house", { SqliteRepo::in_house(conn) })
}

pub fn reservation_check_in(conn: &mut Connection, id: &str, today: NaiveDate) -> Result<Reservation> {
    logged!("reservation_check_in", reservation_id = id; {
        let tx = begin(conn)?;
        let mut reservation = SqliteRepo::require_reservation(&tx, id)?;
        reservation.check_in(today, Utc::now())?;

        let mut room = SqliteRepo::require_room(&tx, &reservation.room_id)?;
        if room.status != RoomStatus::Available {
            return Err(unavailable(&reservation).into());
        }
        room.occupy()?;
        SqliteRepo::update_room(&tx, &room)?;

        let invoice = open_invoice_in(
            &tx,
            NewInvoice {
                guest_id: reservation.guest_id.clone(),
                reservation_id: Some(reservation.id.clone()),
                notes: None,
            },
            today,
        )?;
        reservation.invoice_id = Some(invoice.id);
        SqliteRepo::update_reservation(&tx, &reservation)?;
        commit(tx)?;
        Ok(reservation)
    })
}

/// Bill the stay, free the room for cleaning and queue the cleaning task.
///
/// The room charge goes on the reservation's invoice; if that invoice no
/// longer accepts lines (already settled in full) a new one is opened for
/// the guest and linked to the reservation instead.
pub fn reservation_check_out(
    conn: &mut Connection,
    id: &str,
    today: NaiveDate,
) -> Result<CheckOutSummary> {
    logged!("reservation_check_out", reservation_id = id; {
        let tx = begin(conn)?;
        let mut reservation = SqliteRepo::require_reservation(&tx, id)?;
        reservation.check_out(Utc::now())?;

        let mut room = SqliteRepo::require_room(&tx, &reservation.room_id)?;
        room.vacate()?;
        SqliteRepo::update_room(&tx, &room)?;

        let existing = match &reservation.invoice_id {
            Some(invoice_id) => Some(SqliteRepo::require_invoice(&tx, invoice_id)?),
            None => None,
        };
        let mut invoice = match existing {
            Some(invoice) if invoice.ensure_accepts_items().is_ok() => invoice,
            _ => open_invoice_in(
                &tx,
                NewInvoice {
                    guest_id: reservation.guest_id.clone(),
                    reservation_id: Some(reservation.id.clone()),
                    notes: None,
                },
                today,
            )?,
        };
        add_item_in(
            &tx,
            &mut invoice,
            NewInvoiceItem {
                description: format!("Room {}, {} nights", room.number, reservation.nights()),
                category: ItemCategory::Room,
                quantity: reservation.nights(),
                unit_price_cents: reservation.nightly_rate_cents,
                service_date: Some(today),
            },
            today,
        )?;
        reservation.invoice_id = Some(invoice.id.clone());
        SqliteRepo::update_reservation(&tx, &reservation)?;

        let task = HousekeepingTask::create(
            new_id(),
            NewTask {
                room_id: room.id.clone(),
                task_type: TaskType::Cleaning,
                priority: Some(TaskPriority::High),
                assigned_to: None,
                scheduled_for: Some(today),
                notes: Some(format!("Departure {}", reservation.confirmation_code)),
            },
            today,
        )?;
        SqliteRepo::insert_task(&tx, &task)?;
        commit(tx)?;

        Ok(CheckOutSummary {
            reservation,
            invoice,
            housekeeping_task: task,
        })
    })
}

pub fn reservation_cancel(conn: &Connection, id: &str, reason: Option<String>) -> Result<Reservation> {
    logged!("reservation_cancel", reservation_id = id; {
        let mut reservation = SqliteRepo::require_reservation(conn, id)?;
        reservation.cancel(reason, Utc::now())?;
        SqliteRepo::update_reservation(conn, &reservation)?;
        Ok(reservation)
    })
}

pub fn reservation_no_show(conn: &Connection, id: &str, today: NaiveDate) -> Result<Reservation> {
    logged!("reservation_no_show", reservation_id = id; {
        let mut reservation = SqliteRepo::require_reservation(conn, id)?;
        reservation.mark_no_show(today, Utc::now())?;
        SqliteRepo::update_reservation(conn, &reservation)?;
        Ok(reservation)
    })
}
