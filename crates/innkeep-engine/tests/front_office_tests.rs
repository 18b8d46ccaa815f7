// Integration tests for the front office: rooms, bookings, stays and billing.

mod common;

use common::*;
use innkeep_core::errors::ExErrorKind;
use innkeep_core::model::*;
use innkeep_engine::commands::{billing, guests, housekeeping, posting, reservations, rooms};

// ---------------------------------------------------------------------------
// booking rules
// ---------------------------------------------------------------------------

#[test]
fn test_overlapping_stay_is_refused() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");

    reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();

    let err = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 12), date(3, 14)))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::RoomUnavailable);
    assert_eq!(err.entity_id(), Some(r.id.as_str()));

    // Back-to-back stays share the changeover day
    reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 13), date(3, 15))).unwrap();
}

#[test]
fn test_party_larger_than_room_is_refused() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");

    let mut input = booking(&g, &r, date(3, 10), date(3, 11));
    input.children = 1;
    let err = reservations::reservation_create(&mut conn, input).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CapacityExceeded);
}

#[test]
fn test_rate_defaults_to_room_type() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 15_500, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");

    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 12))).unwrap();
    assert_eq!(res.nightly_rate_cents, 15_500);
    assert_eq!(res.status, ReservationStatus::Confirmed);
    assert!(res.confirmation_code.starts_with("RES-"));
}

#[test]
fn test_cancelled_stay_frees_the_dates() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");

    let first = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();
    let cancelled =
        reservations::reservation_cancel(&conn, &first.id, Some("change of plans".to_string())).unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();
}

#[test]
fn test_no_show_waits_for_arrival_date() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");
    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();

    let err = reservations::reservation_no_show(&conn, &res.id, date(3, 9)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let marked = reservations::reservation_no_show(&conn, &res.id, date(3, 10)).unwrap();
    assert_eq!(marked.status, ReservationStatus::NoShow);
}

#[test]
fn test_availability_skips_booked_rooms() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let booked = room(&conn, "101", &t);
    let free = room(&conn, "102", &t);
    let g = guest(&conn, "Hopper");
    reservations::reservation_create(&mut conn, booking(&g, &booked, date(3, 10), date(3, 13))).unwrap();

    let available = rooms::room_availability(
        &conn,
        &AvailabilityQuery {
            check_in: date(3, 11),
            check_out: date(3, 12),
            guests: Some(2),
            room_type_id: None,
        },
    )
    .unwrap();

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].room.id, free.id);
    assert_eq!(available[0].nights, 1);
    assert_eq!(available[0].total_cents, 12_000);
}

#[test]
fn test_room_type_in_use_cannot_be_deleted() {
    let (_tmp, conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    room(&conn, "101", &t);

    let err = rooms::room_type_delete(&conn, &t.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
}

// ---------------------------------------------------------------------------
// stay lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_stay_lifecycle_posts_room_revenue_and_frees_room() {
    let (_tmp, mut conn) = setup_db();
    room_tax(&conn);
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");
    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();

    let checked_in = reservations::reservation_check_in(&mut conn, &res.id, date(3, 10)).unwrap();
    assert_eq!(checked_in.status, ReservationStatus::CheckedIn);
    assert!(checked_in.invoice_id.is_some());
    assert_eq!(rooms::room_get(&conn, &r.id).unwrap().status, RoomStatus::Occupied);

    let summary = reservations::reservation_check_out(&mut conn, &res.id, date(3, 13)).unwrap();
    assert_eq!(summary.reservation.status, ReservationStatus::CheckedOut);
    assert_eq!(summary.invoice.id, checked_in.invoice_id.clone().unwrap());
    assert_eq!(summary.invoice.items.len(), 1);
    assert_eq!(summary.invoice.items[0].quantity, 3);
    assert_eq!(summary.invoice.subtotal_cents, 36_000);
    assert_eq!(summary.invoice.tax_cents, 3_600);
    assert_eq!(summary.invoice.total_cents, 39_600);
    assert_eq!(summary.housekeeping_task.task_type, TaskType::Cleaning);
    assert_eq!(summary.housekeeping_task.priority, TaskPriority::High);
    assert_eq!(rooms::room_get(&conn, &r.id).unwrap().status, RoomStatus::Cleaning);

    assert_eq!(balance(&conn, "1200"), 39_600);
    assert_eq!(balance(&conn, "4000"), 36_000);
    assert_eq!(balance(&conn, "2100"), 3_600);

    let paid = billing::invoice_record_payment(
        &mut conn,
        &summary.invoice.id,
        NewPayment {
            amount_cents: 39_600,
            method: PaymentMethod::Card,
            reference: Some("AUTH-77".to_string()),
        },
        date(3, 13),
    )
    .unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.balance_cents, 0);
    assert!(paid.payments[0].transaction_id.is_some());
    assert_eq!(balance(&conn, "1200"), 0);
    assert_eq!(balance(&conn, "1010"), 39_600);

    housekeeping::task_complete(&mut conn, &summary.housekeeping_task.id).unwrap();
    assert_eq!(rooms::room_get(&conn, &r.id).unwrap().status, RoomStatus::Available);
}

#[test]
fn test_check_in_outside_stay_is_refused() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");
    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();

    let err = reservations::reservation_check_in(&mut conn, &res.id, date(3, 9)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(rooms::room_get(&conn, &r.id).unwrap().status, RoomStatus::Available);
}

#[test]
fn test_check_out_requires_check_in() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");
    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();

    let err = reservations::reservation_check_out(&mut conn, &res.id, date(3, 13)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
}

#[test]
fn test_update_rechecks_availability_against_other_stays() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");

    let first = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 13))).unwrap();
    reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 15), date(3, 17))).unwrap();

    // Overlapping its own dates is fine
    let extended = reservations::reservation_update(
        &mut conn,
        &first.id,
        ReservationPatch {
            check_out: Some(date(3, 14)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(extended.total_cents, 48_000);

    let err = reservations::reservation_update(
        &mut conn,
        &first.id,
        ReservationPatch {
            check_out: Some(date(3, 16)),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::RoomUnavailable);

    let stored = reservations::reservation_get(&conn, &first.id).unwrap();
    assert_eq!(stored.check_out, date(3, 14));
    assert_eq!(stored.total_cents, 48_000);
}

#[test]
fn test_booked_guest_and_room_cannot_be_deleted() {
    let (_tmp, mut conn) = setup_db();
    let t = room_type(&conn, 12_000, 2);
    let r = room(&conn, "101", &t);
    let g = guest(&conn, "Hopper");
    let res = reservations::reservation_create(&mut conn, booking(&g, &r, date(3, 10), date(3, 12))).unwrap();

    let err = guests::guest_delete(&conn, &g.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
    let err = rooms::room_delete(&conn, &r.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);

    reservations::reservation_check_in(&mut conn, &res.id, date(3, 10)).unwrap();
    let err = guests::guest_delete(&conn, &g.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
    let err = rooms::room_delete(&conn, &r.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);

    assert!(guests::guest_get(&conn, &g.id).is_ok());
    assert!(rooms::room_get(&conn, &r.id).is_ok());
}

// ---------------------------------------------------------------------------
// invoices
// ---------------------------------------------------------------------------

fn open_folio(conn: &mut rusqlite::Connection, guest: &Guest) -> Invoice {
    billing::invoice_create(
        conn,
        NewInvoice {
            guest_id: guest.id.clone(),
            reservation_id: None,
            notes: None,
        },
        date(3, 10),
    )
    .unwrap()
}

fn charge(description: &str, category: ItemCategory, unit_price_cents: i64) -> NewInvoiceItem {
    NewInvoiceItem {
        description: description.to_string(),
        category,
        quantity: 1,
        unit_price_cents,
        service_date: None,
    }
}

#[test]
fn test_removed_line_reverses_its_posting() {
    let (_tmp, mut conn) = setup_db();
    let g = guest(&conn, "Hopper");
    let invoice = open_folio(&mut conn, &g);

    let invoice = billing::invoice_add_item(
        &mut conn,
        &invoice.id,
        charge("Airport transfer", ItemCategory::Service, 5_000),
        date(3, 10),
    )
    .unwrap();
    let transfer = invoice.items[0].clone();
    let invoice = billing::invoice_add_item(
        &mut conn,
        &invoice.id,
        charge("Dinner", ItemCategory::FoodBeverage, 2_000),
        date(3, 10),
    )
    .unwrap();
    assert_eq!(balance(&conn, "1200"), 7_000);
    assert_eq!(balance(&conn, "4200"), 5_000);

    let invoice = billing::invoice_remove_item(&mut conn, &invoice.id, &transfer.id).unwrap();
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.total_cents, 2_000);
    assert_eq!(balance(&conn, "1200"), 2_000);
    assert_eq!(balance(&conn, "4200"), 0);
    assert_eq!(balance(&conn, "4100"), 2_000);

    let txn_id = transfer.transaction_id.unwrap();
    let txn = posting::transaction_get(&conn, &txn_id).unwrap();
    assert_eq!(txn.status, TransactionStatus::Void);
}

#[test]
fn test_invoice_posting_is_voided_through_its_invoice_only() {
    let (_tmp, mut conn) = setup_db();
    let g = guest(&conn, "Hopper");
    let invoice = open_folio(&mut conn, &g);
    let invoice = billing::invoice_add_item(
        &mut conn,
        &invoice.id,
        charge("Airport transfer", ItemCategory::Service, 5_000),
        date(3, 10),
    )
    .unwrap();
    let txn_id = invoice.items[0].transaction_id.clone().unwrap();

    let err = posting::transaction_void(&mut conn, &txn_id, None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
    assert_eq!(err.entity_id(), Some(txn_id.as_str()));
    assert_eq!(balance(&conn, "1200"), 5_000);
    let txn = posting::transaction_get(&conn, &txn_id).unwrap();
    assert_eq!(txn.status, TransactionStatus::Posted);

    let voided = billing::invoice_void(&mut conn, &invoice.id, None).unwrap();
    assert_eq!(voided.status, InvoiceStatus::Void);
    assert_eq!(balance(&conn, "1200"), 0);
    assert_eq!(balance(&conn, "4200"), 0);
}

#[test]
fn test_line_too_large_is_refused_without_posting() {
    let (_tmp, mut conn) = setup_db();
    let g = guest(&conn, "Hopper");
    let invoice = open_folio(&mut conn, &g);

    let mut item = charge("Banquet", ItemCategory::FoodBeverage, i64::MAX);
    item.quantity = 2;
    let err = billing::invoice_add_item(&mut conn, &invoice.id, item, date(3, 10)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(balance(&conn, "1200"), 0);
    assert!(billing::invoice_get(&conn, &invoice.id).unwrap().items.is_empty());
}

#[test]
fn test_void_invoice_reverses_revenue() {
    let (_tmp, mut conn) = setup_db();
    let g = guest(&conn, "Hopper");
    let invoice = billing::invoice_create(
        &mut conn,
        NewInvoice {
            guest_id: g.id.clone(),
            reservation_id: None,
            notes: None,
        },
        date(3, 10),
    )
    .unwrap();
    assert!(invoice.invoice_number.starts_with("INV-"));

    let invoice = billing::invoice_add_item(
        &mut conn,
        &invoice.id,
        NewInvoiceItem {
            description: "Airport transfer".to_string(),
            category: ItemCategory::Service,
            quantity: 1,
            unit_price_cents: 5_000,
            service_date: None,
        },
        date(3, 10),
    )
    .unwrap();
    assert_eq!(invoice.total_cents, 5_000);
    assert_eq!(balance(&conn, "4200"), 5_000);

    let voided = billing::invoice_void(&mut conn, &invoice.id, Some("duplicate".to_string())).unwrap();
    assert_eq!(voided.status, InvoiceStatus::Void);
    assert_eq!(balance(&conn, "4200"), 0);
    assert_eq!(balance(&conn, "1200"), 0);
}

#[test]
fn test_payment_cannot_exceed_balance() {
    let (_tmp, mut conn) = setup_db();
    let g = guest(&conn, "Hopper");
    let invoice = billing::invoice_create(
        &mut conn,
        NewInvoice {
            guest_id: g.id.clone(),
            reservation_id: None,
            notes: None,
        },
        date(3, 10),
    )
    .unwrap();
    billing::invoice_add_item(
        &mut conn,
        &invoice.id,
        NewInvoiceItem {
            description: "Dinner".to_string(),
            category: ItemCategory::FoodBeverage,
            quantity: 2,
            unit_price_cents: 2_500,
            service_date: None,
        },
        date(3, 10),
    )
    .unwrap();

    let err = billing::invoice_record_payment(
        &mut conn,
        &invoice.id,
        NewPayment {
            amount_cents: 6_000,
            method: PaymentMethod::Cash,
            reference: None,
        },
        date(3, 10),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::PaymentExceedsBalance);
    assert_eq!(balance(&conn, "1000"), 0);

    let partial = billing::invoice_record_payment(
        &mut conn,
        &invoice.id,
        NewPayment {
            amount_cents: 2_000,
            method: PaymentMethod::Cash,
            reference: None,
        },
        date(3, 10),
    )
    .unwrap();
    assert_eq!(partial.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(partial.balance_cents, 3_000);

    let outstanding = billing::invoice_outstanding(&conn).unwrap();
    assert_eq!(outstanding.invoice_count, 1);
    assert_eq!(outstanding.balance_cents, 3_000);
}
