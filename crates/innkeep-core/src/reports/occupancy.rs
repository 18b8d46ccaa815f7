//! Occupancy, ADR and RevPAR

use chrono::NaiveDate;
use serde::Serialize;

use crate::money::{per_unit, ratio_bp};
use crate::ops::stay_ops::{each_day, nights_within};

/// A sold stay as seen by the occupancy report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldStay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nightly_rate_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NightOccupancy {
    pub date: NaiveDate,
    pub rooms_sold: i64,
    pub rooms_available: i64,
    pub occupancy_bp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub nights: Vec<NightOccupancy>,
    pub room_nights_sold: i64,
    pub room_nights_available: i64,
    pub occupancy_bp: i64,
    pub room_revenue_cents: i64,
    /// Average daily rate
    pub adr_cents: i64,
    /// Revenue per available room-night
    pub revpar_cents: i64,
}

/// `sellable_rooms` is the count of rooms not out of order;
/// `stays` excludes cancelled and no-show reservations.
pub fn occupancy(
    from: NaiveDate,
    to: NaiveDate,
    sellable_rooms: i64,
    stays: &[SoldStay],
) -> OccupancyReport {
    let nights: Vec<NightOccupancy> = each_day(from, to)
        .map(|date| {
            let sold = stays
                .iter()
                .filter(|s| s.check_in <= date && date < s.check_out)
                .count() as i64;
            NightOccupancy {
                date,
                rooms_sold: sold,
                rooms_available: sellable_rooms,
                occupancy_bp: ratio_bp(sold, sellable_rooms),
            }
        })
        .collect();

    let room_nights_sold: i64 = nights.iter().map(|n| n.rooms_sold).sum();
    let room_nights_available: i64 = nights.iter().map(|n| n.rooms_available).sum();
    let room_revenue_cents: i64 = stays
        .iter()
        .map(|s| nights_within(s.check_in, s.check_out, from, to) * s.nightly_rate_cents)
        .sum();

    OccupancyReport {
        from,
        to,
        nights,
        room_nights_sold,
        room_nights_available,
        occupancy_bp: ratio_bp(room_nights_sold, room_nights_available),
        room_revenue_cents,
        adr_cents: per_unit(room_revenue_cents, room_nights_sold),
        revpar_cents: per_unit(room_revenue_cents, room_nights_available),
    }
}
