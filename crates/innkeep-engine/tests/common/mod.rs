// Shared fixtures for engine integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use innkeep_core::model::*;
use innkeep_engine::commands::{employees, guests, rooms, tax};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;
use tempfile::TempDir;

pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let conn = innkeep_store::db::open_and_migrate(temp_dir.path().join("test.db")).unwrap();
    (temp_dir, conn)
}

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

pub fn balance(conn: &Connection, code: &str) -> i64 {
    SqliteRepo::require_account_by_code(conn, code)
        .unwrap()
        .balance_cents
}

pub fn room_type(conn: &Connection, rate: i64, capacity: u32) -> RoomType {
    rooms::room_type_create(
        conn,
        NewRoomType {
            name: format!("Type {}", new_id()),
            description: None,
            base_rate_cents: rate,
            capacity,
            amenities: vec![],
        },
    )
    .unwrap()
}

pub fn room(conn: &Connection, number: &str, room_type: &RoomType) -> Room {
    rooms::room_create(
        conn,
        NewRoom {
            number: number.to_string(),
            floor: 1,
            room_type_id: room_type.id.clone(),
            status: None,
            notes: None,
        },
    )
    .unwrap()
}

pub fn guest(conn: &Connection, last_name: &str) -> Guest {
    guests::guest_create(
        conn,
        NewGuest {
            first_name: "Grace".to_string(),
            last_name: last_name.to_string(),
            email: None,
            phone: None,
            address: None,
            id_document: None,
            nationality: None,
            vip: false,
            notes: None,
        },
    )
    .unwrap()
}

pub fn booking(guest: &Guest, room: &Room, check_in: NaiveDate, check_out: NaiveDate) -> NewReservation {
    NewReservation {
        guest_id: guest.id.clone(),
        room_id: room.id.clone(),
        check_in,
        check_out,
        adults: 2,
        children: 0,
        source: None,
        nightly_rate_cents: None,
        special_requests: None,
    }
}

/// 10% on room lines only
pub fn room_tax(conn: &Connection) -> TaxRate {
    tax::tax_rate_create(
        conn,
        NewTaxRate {
            name: "Lodging tax".to_string(),
            rate_bp: 1_000,
            applies_to: Some(ItemCategory::Room),
            is_active: true,
        },
    )
    .unwrap()
}

pub fn employee(conn: &Connection, pay_type: PayType, hire_date: NaiveDate) -> Employee {
    employees::employee_create(
        conn,
        NewEmployee {
            first_name: "Ida".to_string(),
            last_name: "Wells".to_string(),
            email: None,
            phone: None,
            department: Department::Housekeeping,
            position: "Attendant".to_string(),
            hire_date,
            pay_type,
            base_salary_cents: 3_650_000,
            hourly_rate_cents: 2_400,
            annual_leave_days: 10,
        },
    )
    .unwrap()
}
