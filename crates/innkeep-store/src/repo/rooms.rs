//! Room types and rooms

use chrono::NaiveDate;
use innkeep_core::model::{ReservationStatus, Room, RoomFilter, RoomStatus, RoomType};
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, query_all, query_opt, text_list, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const ROOM_TYPE_COLUMNS: &str =
    "id, name, description, base_rate_cents, capacity, amenities, created_at, updated_at";

const ROOM_COLUMNS: &str =
    "id, number, floor, room_type_id, status, notes, created_at, updated_at";

fn room_type_from_row(row: &Row<'_>) -> rusqlite::Result<RoomType> {
    let amenities: String = row.get(5)?;
    Ok(RoomType {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        base_rate_cents: row.get(3)?,
        capacity: row.get(4)?,
        amenities: serde_json::from_str(&amenities).unwrap_or_default(),
        created_at: ts(row.get(6)?),
        updated_at: ts(row.get(7)?),
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        number: row.get(1)?,
        floor: row.get(2)?,
        room_type_id: row.get(3)?,
        status: enum_col(row, 4)?,
        notes: row.get(5)?,
        created_at: ts(row.get(6)?),
        updated_at: ts(row.get(7)?),
    })
}

fn amenities_json(room_type: &RoomType) -> String {
    serde_json::to_string(&room_type.amenities).unwrap_or_else(|_| "[]".to_string())
}

impl SqliteRepo {
    // ----- room types -----

    pub fn insert_room_type(conn: &Connection, room_type: &RoomType) -> Result<()> {
        conn.execute(
            "INSERT INTO room_types (id, name, description, base_rate_cents, capacity, amenities, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                room_type.id,
                room_type.name,
                room_type.description,
                room_type.base_rate_cents,
                room_type.capacity,
                amenities_json(room_type),
                room_type.created_at.timestamp(),
                room_type.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_room_type(conn: &Connection, room_type: &RoomType) -> Result<()> {
        execute_one(
            conn,
            "UPDATE room_types SET name = ?2, description = ?3, base_rate_cents = ?4, capacity = ?5,
                amenities = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                room_type.id,
                room_type.name,
                room_type.description,
                room_type.base_rate_cents,
                room_type.capacity,
                amenities_json(room_type),
                room_type.updated_at.timestamp(),
            ],
            "room type",
            &room_type.id,
        )
    }

    pub fn get_room_type(conn: &Connection, id: &str) -> Result<Option<RoomType>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM room_types WHERE id = ?1", ROOM_TYPE_COLUMNS),
            [id],
            room_type_from_row,
        )
    }

    pub fn require_room_type(conn: &Connection, id: &str) -> Result<RoomType> {
        Self::get_room_type(conn, id)?.ok_or_else(|| not_found("room type", id))
    }

    pub fn list_room_types(conn: &Connection) -> Result<Vec<RoomType>> {
        query_all(
            conn,
            &format!("SELECT {} FROM room_types ORDER BY name", ROOM_TYPE_COLUMNS),
            [],
            room_type_from_row,
        )
    }

    pub fn delete_room_type(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM room_types WHERE id = ?1", [id], "room type", id)
    }

    pub fn count_rooms_of_type(conn: &Connection, room_type_id: &str) -> Result<i64> {
        count(
            conn,
            "SELECT COUNT(*) FROM rooms WHERE room_type_id = ?1",
            [room_type_id],
        )
    }

    // ----- rooms -----

    pub fn insert_room(conn: &Connection, room: &Room) -> Result<()> {
        conn.execute(
            "INSERT INTO rooms (id, number, floor, room_type_id, status, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                room.id,
                room.number,
                room.floor,
                room.room_type_id,
                room.status.as_str(),
                room.notes,
                room.created_at.timestamp(),
                room.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_room(conn: &Connection, room: &Room) -> Result<()> {
        execute_one(
            conn,
            "UPDATE rooms SET number = ?2, floor = ?3, room_type_id = ?4, status = ?5, notes = ?6,
                updated_at = ?7
             WHERE id = ?1",
            params![
                room.id,
                room.number,
                room.floor,
                room.room_type_id,
                room.status.as_str(),
                room.notes,
                room.updated_at.timestamp(),
            ],
            "room",
            &room.id,
        )
    }

    pub fn get_room(conn: &Connection, id: &str) -> Result<Option<Room>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM rooms WHERE id = ?1", ROOM_COLUMNS),
            [id],
            room_from_row,
        )
    }

    pub fn require_room(conn: &Connection, id: &str) -> Result<Room> {
        Self::get_room(conn, id)?.ok_or_else(|| not_found("room", id))
    }

    pub fn list_rooms(conn: &Connection, filter: &RoomFilter) -> Result<Vec<Room>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM rooms
                 WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR room_type_id = ?2)
                 ORDER BY number",
                ROOM_COLUMNS
            ),
            params![filter.status.map(|s| s.as_str()), filter.room_type_id],
            room_from_row,
        )
    }

    pub fn delete_room(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM rooms WHERE id = ?1", [id], "room", id)
    }

    /// Number of rooms per status, every status present
    pub fn room_status_counts(conn: &Connection) -> Result<Vec<(RoomStatus, i64)>> {
        let counted = query_all(
            conn,
            "SELECT status, COUNT(*) FROM rooms GROUP BY status",
            [],
            |row| Ok((enum_col::<RoomStatus>(row, 0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(RoomStatus::ALL
            .iter()
            .map(|status| {
                let n = counted
                    .iter()
                    .find(|(s, _)| s == status)
                    .map_or(0, |(_, n)| *n);
                (*status, n)
            })
            .collect())
    }

    /// Rooms with a confirmed or checked-in stay intersecting `[check_in, check_out)`
    pub fn booked_room_ids(
        conn: &Connection,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<String>> {
        query_all(
            conn,
            &format!(
                "SELECT DISTINCT room_id FROM reservations
                 WHERE status IN ({}) AND check_in < ?2 AND check_out > ?1",
                text_list(ReservationStatus::BLOCKING.iter().map(|s| s.as_str()))
            ),
            params![check_in, check_out],
            |row| row.get(0),
        )
    }
}
