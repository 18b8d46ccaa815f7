//! Room types, rooms, availability and the status board

use std::collections::BTreeMap;

use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{
    new_id, AvailabilityQuery, NewRoom, NewRoomType, Room, RoomFilter, RoomPatch, RoomStatus,
    RoomType, RoomTypePatch,
};
use innkeep_core::ops::stay_ops::nights;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;
use serde::Serialize;

use crate::Result;

/// A room that can be sold for the whole requested stay, with its quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableRoom {
    pub room: Room,
    pub room_type: RoomType,
    pub nights: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStatusBoard {
    pub total_rooms: i64,
    pub by_status: BTreeMap<String, i64>,
}

pub fn room_type_create(conn: &Connection, input: NewRoomType) -> Result<RoomType> {
    logged!("room_type_create", {
        let room_type = RoomType::create(new_id(), input)?;
        SqliteRepo::insert_room_type(conn, &room_type)?;
        Ok(room_type)
    })
}

pub fn room_type_update(conn: &Connection, id: &str, patch: RoomTypePatch) -> Result<RoomType> {
    logged!("room_type_update", room_type_id = id; {
        let mut room_type = SqliteRepo::require_room_type(conn, id)?;
        room_type.apply(patch)?;
        SqliteRepo::update_room_type(conn, &room_type)?;
        Ok(room_type)
    })
}

pub fn room_type_get(conn: &Connection, id: &str) -> Result<RoomType> {
    logged!("room_type_get", { SqliteRepo::require_room_type(conn, id) })
}

pub fn room_type_list(conn: &Connection) -> Result<Vec<RoomType>> {
    logged!("room_type_list", { SqliteRepo::list_room_types(conn) })
}

pub fn room_type_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("room_type_delete", room_type_id = id; {
        SqliteRepo::require_room_type(conn, id)?;
        let rooms = SqliteRepo::count_rooms_of_type(conn, id)?;
        if rooms > 0 {
            return Err(InnkeepError::InUse {
                entity: "room type",
                id: id.to_string(),
                reason: format!("{} rooms use it", rooms),
            }
            .into());
        }
        SqliteRepo::delete_room_type(conn, id)
    })
}

pub fn room_create(conn: &Connection, input: NewRoom) -> Result<Room> {
    logged!("room_create", {
        SqliteRepo::require_room_type(conn, &input.room_type_id)?;
        let room = Room::create(new_id(), input)?;
        SqliteRepo::insert_room(conn, &room)?;
        Ok(room)
    })
}

pub fn room_update(conn: &Connection, id: &str, patch: RoomPatch) -> Result<Room> {
    logged!("room_update", room_id = id; {
        let mut room = SqliteRepo::require_room(conn, id)?;
        if let Some(type_id) = &patch.room_type_id {
            SqliteRepo::require_room_type(conn, type_id)?;
        }
        room.apply(patch)?;
        SqliteRepo::update_room(conn, &room)?;
        Ok(room)
    })
}

pub fn room_get(conn: &Connection, id: &str) -> Result<Room> {
    logged!("room_get", { SqliteRepo::require_room(conn, id) })
}

pub fn room_list(conn: &Connection, filter: &RoomFilter) -> Result<Vec<Room>> {
    logged!("room_list", { SqliteRepo::list_rooms(conn, filter) })
}

pub fn room_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("room_delete", room_id = id; {
        SqliteRepo::require_room(conn, id)?;
        let active = SqliteRepo::count_active_reservations_for_room(conn, id)?;
        if active > 0 {
            return Err(InnkeepError::InUse {
                entity: "room",
                id: id.to_string(),
                reason: format!("{} confirmed or checked-in reservations", active),
            }
            .into());
        }
        SqliteRepo::delete_room(conn, id)
    })
}

/// Front-desk or housekeeping override of a room's status
pub fn room_set_status(conn: &Connection, id: &str, status: RoomStatus) -> Result<Room> {
    logged!("room_set_status", room_id = id; {
        let mut room = SqliteRepo::require_room(conn, id)?;
        room.set_status_manually(status)?;
        SqliteRepo::update_room(conn, &room)?;
        Ok(room)
    })
}

/// Rooms bookable for `[check_in, check_out)`, ordered by room number
pub fn room_availability(conn: &Connection, query: &AvailabilityQuery) -> Result<Vec<AvailableRoom>> {
    logged!("room_availability", {
        if query.check_out <= query.check_in {
            return Err(InnkeepError::invalid("check_out", "must be after check_in").into());
        }
        let stay_nights = nights(query.check_in, query.check_out);
        let booked = SqliteRepo::booked_room_ids(conn, query.check_in, query.check_out)?;
        let types: BTreeMap<String, RoomType> = SqliteRepo::list_room_types(conn)?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        let filter = RoomFilter {
            room_type_id: query.room_type_id.clone(),
            ..RoomFilter::default()
        };

        let mut available = Vec::new();
        for room in SqliteRepo::list_rooms(conn, &filter)? {
            if room.status.blocks_booking() || booked.contains(&room.id) {
                continue;
            }
            let Some(room_type) = types.get(&room.room_type_id) else {
                continue;
            };
            if query.guests.is_some_and(|g| g > room_type.capacity) {
                continue;
            }
            available.push(AvailableRoom {
                nights: stay_nights,
                total_cents: stay_nights * room_type.base_rate_cents,
                room_type: room_type.clone(),
                room,
            });
        }
        Ok(available)
    })
}

pub fn room_status_board(conn: &Connection) -> Result<RoomStatusBoard> {
    logged!("room_status_board", {
        let counts = SqliteRepo::room_status_counts(conn)?;
        Ok(RoomStatusBoard {
            total_rooms: counts.iter().map(|(_, n)| n).sum(),
            by_status: counts
                .into_iter()
                .map(|(status, n)| (status.to_string(), n))
                .collect(),
        })
    })
}
