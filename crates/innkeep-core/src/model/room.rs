use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::rules::validation::{optional_text, require_non_negative, require_status, require_text};

string_enum! {
    /// Housekeeping/front-desk state of a physical room
    pub enum RoomStatus {
        Available => "available",
        Occupied => "occupied",
        Cleaning => "cleaning",
        Maintenance => "maintenance",
        OutOfOrder => "out_of_order",
    }
}

impl RoomStatus {
    /// Rooms that count towards available inventory
    pub fn is_sellable(&self) -> bool {
        !matches!(self, RoomStatus::OutOfOrder)
    }

    /// Rooms that cannot be offered for a new stay at all
    pub fn blocks_booking(&self) -> bool {
        matches!(self, RoomStatus::Maintenance | RoomStatus::OutOfOrder)
    }
}

/// A category of rooms sharing price and capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_rate_cents: i64,
    pub capacity: u32,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoomType {
    pub name: String,
    pub description: Option<String>,
    pub base_rate_cents: i64,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_rate_cents: Option<i64>,
    pub capacity: Option<u32>,
    pub amenities: Option<Vec<String>>,
}

impl RoomType {
    pub fn create(id: String, input: NewRoomType) -> Result<Self> {
        let now = Utc::now();
        let room_type = Self {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            base_rate_cents: input.base_rate_cents,
            capacity: input.capacity,
            amenities: input.amenities,
            created_at: now,
            updated_at: now,
        };
        room_type.validate()?;
        Ok(room_type)
    }

    pub fn apply(&mut self, patch: RoomTypePatch) -> Result<()> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if let Some(rate) = patch.base_rate_cents {
            self.base_rate_cents = rate;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_non_negative("base_rate_cents", self.base_rate_cents)?;
        if self.capacity == 0 {
            return Err(InnkeepError::invalid("capacity", "must be at least 1"));
        }
        Ok(())
    }
}

/// A physical, bookable room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub number: String,
    pub floor: i32,
    pub room_type_id: String,
    pub status: RoomStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub number: String,
    pub floor: i32,
    pub room_type_id: String,
    pub status: Option<RoomStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomPatch {
    pub number: Option<String>,
    pub floor: Option<i32>,
    pub room_type_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub room_type_id: Option<String>,
}

/// Search for rooms free over a stay
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: Option<u32>,
    pub room_type_id: Option<String>,
}

impl Room {
    pub fn create(id: String, input: NewRoom) -> Result<Self> {
        let status = input.status.unwrap_or(RoomStatus::Available);
        if status == RoomStatus::Occupied {
            return Err(InnkeepError::invalid(
                "status",
                "a new room cannot start occupied",
            ));
        }
        let now = Utc::now();
        let room = Self {
            id,
            number: input.number.trim().to_string(),
            floor: input.floor,
            room_type_id: input.room_type_id,
            status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        room.validate()?;
        Ok(room)
    }

    pub fn apply(&mut self, patch: RoomPatch) -> Result<()> {
        if let Some(number) = patch.number {
            self.number = number.trim().to_string();
        }
        if let Some(floor) = patch.floor {
            self.floor = floor;
        }
        if let Some(room_type_id) = patch.room_type_id {
            self.room_type_id = room_type_id;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        require_text("number", &self.number)?;
        require_text("room_type_id", &self.room_type_id)?;
        optional_text("notes", self.notes.as_deref())
    }

    /// Manual status change from the front desk or housekeeping board.
    ///
    /// `occupied` is owned by check-in/check-out and cannot be entered or
    /// left through this path.
    pub fn set_status_manually(&mut self, status: RoomStatus) -> Result<()> {
        if status == RoomStatus::Occupied || self.status == RoomStatus::Occupied {
            return Err(InnkeepError::InvalidTransition {
                entity: "room",
                id: self.id.clone(),
                status: self.status.to_string(),
                action: "manually change status of",
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Check-in: an `available` room becomes `occupied`
    pub fn occupy(&mut self) -> Result<()> {
        require_status("room", &self.id, self.status, &[RoomStatus::Available], "check a guest into")?;
        self.status = RoomStatus::Occupied;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Check-out hands the room to housekeeping
    pub fn vacate(&mut self) -> Result<()> {
        require_status("room", &self.id, self.status, &[RoomStatus::Occupied], "check a guest out of")?;
        self.status = RoomStatus::Cleaning;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_room() -> NewRoom {
        NewRoom {
            number: " 101 ".to_string(),
            floor: 1,
            room_type_id: "rt-1".to_string(),
            status: None,
            notes: None,
        }
    }

    #[test]
    fn test_create_room_trims_and_defaults() {
        let room = Room::create("r-1".to_string(), new_room()).unwrap();
        assert_eq!(room.number, "101");
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[test]
    fn test_create_room_rejects_occupied() {
        let mut input = new_room();
        input.status = Some(RoomStatus::Occupied);
        assert!(Room::create("r-1".to_string(), input).is_err());
    }

    #[test]
    fn test_manual_status_cannot_touch_occupied() {
        let mut room = Room::create("r-1".to_string(), new_room()).unwrap();
        assert!(room.set_status_manually(RoomStatus::Occupied).is_err());

        room.status = RoomStatus::Occupied;
        assert!(room.set_status_manually(RoomStatus::Available).is_err());
    }

    #[test]
    fn test_occupy_and_vacate() {
        let mut room = Room::create("r-1".to_string(), new_room()).unwrap();
        room.occupy().unwrap();
        assert_eq!(room.status, RoomStatus::Occupied);
        assert!(room.occupy().is_err());
        room.vacate().unwrap();
        assert_eq!(room.status, RoomStatus::Cleaning);
        assert!(room.vacate().is_err());
    }

    #[test]
    fn test_room_type_capacity_must_be_positive() {
        let result = RoomType::create(
            "rt-1".to_string(),
            NewRoomType {
                name: "Double".to_string(),
                description: None,
                base_rate_cents: 12_000,
                capacity: 0,
                amenities: vec![],
            },
        );
        assert!(result.is_err());
    }
}
