use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{new_id, Guest, GuestFilter, GuestPatch, NewGuest, Reservation};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

pub fn guest_create(conn: &Connection, input: NewGuest) -> Result<Guest> {
    logged!("guest_create", {
        let guest = Guest::create(new_id(), input)?;
        SqliteRepo::insert_guest(conn, &guest)?;
        Ok(guest)
    })
}

pub fn guest_update(conn: &Connection, id: &str, patch: GuestPatch) -> Result<Guest> {
    logged!("guest_update", guest_id = id; {
        let mut guest = SqliteRepo::require_guest(conn, id)?;
        guest.apply(patch)?;
        SqliteRepo::update_guest(conn, &guest)?;
        Ok(guest)
    })
}

pub fn guest_get(conn: &Connection, id: &str) -> Result<Guest> {
    logged!("guest_get", { SqliteRepo::require_guest(conn, id) })
}

pub fn guest_list(conn: &Connection, filter: &GuestFilter) -> Result<Vec<Guest>> {
    logged!("guest_list", { SqliteRepo::list_guests(conn, filter) })
}

/// Guests with past stays are kept by the reservation foreign key and
/// surface as `InUse` from the store.
pub fn guest_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("guest_delete", guest_id = id; {
        SqliteRepo::require_guest(conn, id)?;
        let active = SqliteRepo::count_active_reservations_for_guest(conn, id)?;
        if active > 0 {
            return Err(InnkeepError::InUse {
                entity: "guest",
                id: id.to_string(),
                reason: format!("{} confirmed or checked-in reservations", active),
            }
            .into());
        }
        SqliteRepo::delete_guest(conn, id)
    })
}

/// Every reservation of the guest, newest first
pub fn guest_stay_history(conn: &Connection, id: &str) -> Result<Vec<Reservation>> {
    logged!("guest_stay_history", guest_id = id; {
        SqliteRepo::require_guest(conn, id)?;
        SqliteRepo::guest_reservations(conn, id)
    })
}
