use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::money::checked_mul;
use crate::ops::stay_ops;
use crate::rules::validation::{require_non_negative, require_status, require_text};

string_enum! {
    /// Lifecycle of a booking
    pub enum ReservationStatus {
        Confirmed => "confirmed",
        CheckedIn => "checked_in",
        CheckedOut => "checked_out",
        Cancelled => "cancelled",
        NoShow => "no_show",
    }
}

impl ReservationStatus {
    /// Statuses that hold the room for their date range
    pub const BLOCKING: &'static [ReservationStatus] =
        &[ReservationStatus::Confirmed, ReservationStatus::CheckedIn];

    pub fn blocks_room(&self) -> bool {
        Self::BLOCKING.contains(self)
    }
}

string_enum! {
    pub enum BookingSource {
        Direct => "direct",
        Phone => "phone",
        Online => "online",
        WalkIn => "walk_in",
    }
}

/// A guest's claim on a room for a half-open range of nights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub confirmation_code: String,
    pub guest_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub status: ReservationStatus,
    pub source: BookingSource,
    /// Nightly rate locked at booking time
    pub nightly_rate_cents: i64,
    pub total_cents: i64,
    pub special_requests: Option<String>,
    pub invoice_id: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub guest_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "one")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub source: Option<BookingSource>,
    /// Overrides the room type's base rate
    pub nightly_rate_cents: Option<i64>,
    pub special_requests: Option<String>,
}

fn one() -> u32 {
    1
}

/// Editable fields of a confirmed reservation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    pub room_id: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub nightly_rate_cents: Option<i64>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub guest_id: Option<String>,
    pub room_id: Option<String>,
    /// Stays overlapping [from, to)
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Reservation {
    pub fn create(
        id: String,
        confirmation_code: String,
        input: NewReservation,
        nightly_rate_cents: i64,
    ) -> Result<Self> {
        let now = Utc::now();
        let mut reservation = Self {
            id,
            confirmation_code,
            guest_id: input.guest_id,
            room_id: input.room_id,
            check_in: input.check_in,
            check_out: input.check_out,
            adults: input.adults,
            children: input.children,
            status: ReservationStatus::Confirmed,
            source: input.source.unwrap_or(BookingSource::Direct),
            nightly_rate_cents,
            total_cents: 0,
            special_requests: input.special_requests,
            invoice_id: None,
            checked_in_at: None,
            checked_out_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        reservation.validate()?;
        reservation.total_cents = reservation.room_total_cents()?;
        Ok(reservation)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("guest_id", &self.guest_id)?;
        require_text("room_id", &self.room_id)?;
        if self.check_out <= self.check_in {
            return Err(InnkeepError::invalid(
                "check_out",
                "must be after check_in",
            ));
        }
        if self.adults == 0 {
            return Err(InnkeepError::invalid("adults", "at least one adult required"));
        }
        require_non_negative("nightly_rate_cents", self.nightly_rate_cents)?;
        self.party_size()?;
        self.room_total_cents().map(|_| ())
    }

    pub fn party_size(&self) -> Result<u32> {
        self.adults
            .checked_add(self.children)
            .ok_or_else(|| InnkeepError::invalid("children", "party size is out of range"))
    }

    pub fn nights(&self) -> i64 {
        stay_ops::nights(self.check_in, self.check_out)
    }

    /// Room charge for the whole stay at the locked rate
    pub fn room_total_cents(&self) -> Result<i64> {
        checked_mul("nightly_rate_cents", self.nights(), self.nightly_rate_cents)
    }

    /// Only confirmed bookings can be edited
    pub fn apply(&mut self, patch: ReservationPatch) -> Result<()> {
        require_status(
            "reservation",
            &self.id,
            self.status,
            &[ReservationStatus::Confirmed],
            "modify",
        )?;
        if let Some(room_id) = patch.room_id {
            self.room_id = room_id;
        }
        if let Some(check_in) = patch.check_in {
            self.check_in = check_in;
        }
        if let Some(check_out) = patch.check_out {
            self.check_out = check_out;
        }
        if let Some(adults) = patch.adults {
            self.adults = adults;
        }
        if let Some(children) = patch.children {
            self.children = children;
        }
        if let Some(rate) = patch.nightly_rate_cents {
            self.nightly_rate_cents = rate;
        }
        if patch.special_requests.is_some() {
            self.special_requests = patch.special_requests;
        }
        self.updated_at = Utc::now();
        self.validate()?;
        self.total_cents = self.room_total_cents()?;
        Ok(())
    }

    /// Arrival is allowed on any night inside the stay
    pub fn check_in(&mut self, today: NaiveDate, at: DateTime<Utc>) -> Result<()> {
        require_status(
            "reservation",
            &self.id,
            self.status,
            &[ReservationStatus::Confirmed],
            "check in",
        )?;
        if today < self.check_in || today >= self.check_out {
            return Err(InnkeepError::invalid(
                "check_in",
                format!(
                    "{} is outside the stay {} to {}",
                    today, self.check_in, self.check_out
                ),
            ));
        }
        self.status = ReservationStatus::CheckedIn;
        self.checked_in_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    pub fn check_out(&mut self, at: DateTime<Utc>) -> Result<()> {
        require_status(
            "reservation",
            &self.id,
            self.status,
            &[ReservationStatus::CheckedIn],
            "check out",
        )?;
        self.status = ReservationStatus::CheckedOut;
        self.checked_out_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    pub fn cancel(&mut self, reason: Option<String>, at: DateTime<Utc>) -> Result<()> {
        require_status(
            "reservation",
            &self.id,
            self.status,
            &[ReservationStatus::Confirmed],
            "cancel",
        )?;
        self.status = ReservationStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.cancellation_reason = reason;
        self.updated_at = at;
        Ok(())
    }

    /// A guest who never arrived; only once the arrival date has come
    pub fn mark_no_show(&mut self, today: NaiveDate, at: DateTime<Utc>) -> Result<()> {
        require_status(
            "reservation",
            &self.id,
            self.status,
            &[ReservationStatus::Confirmed],
            "mark no-show",
        )?;
        if today < self.check_in {
            return Err(InnkeepError::invalid(
                "status",
                format!("arrival date {} has not been reached", self.check_in),
            ));
        }
        self.status = ReservationStatus::NoShow;
        self.updated_at = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn confirmed() -> Reservation {
        Reservation::create(
            "res-1".to_string(),
            "RES-ABCDEF12".to_string(),
            NewReservation {
                guest_id: "g-1".to_string(),
                room_id: "r-1".to_string(),
                check_in: day(10),
                check_out: day(13),
                adults: 2,
                children: 0,
                source: None,
                nightly_rate_cents: None,
                special_requests: None,
            },
            15_000,
        )
        .unwrap()
    }

    #[test]
    fn test_nights_and_total() {
        let r = confirmed();
        assert_eq!(r.nights(), 3);
        assert_eq!(r.room_total_cents().unwrap(), 45_000);
        assert_eq!(r.total_cents, 45_000);
        assert_eq!(r.source, BookingSource::Direct);
    }

    #[test]
    fn test_zero_night_stay_rejected() {
        let mut r = confirmed();
        r.check_out = r.check_in;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_oversized_party_and_rate_rejected() {
        let mut r = confirmed();
        r.adults = u32::MAX;
        r.children = 1;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidInput { ref field, .. } if field == "children"));

        let mut r = confirmed();
        r.nightly_rate_cents = i64::MAX;
        assert!(r.room_total_cents().is_err());
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_check_in_window() {
        let mut r = confirmed();
        assert!(r.check_in(day(9), Utc::now()).is_err());
        assert!(r.check_in(day(13), Utc::now()).is_err());
        r.check_in(day(11), Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::CheckedIn);
        assert!(r.checked_in_at.is_some());
    }

    #[test]
    fn test_cancel_only_when_confirmed() {
        let mut r = confirmed();
        r.check_in(day(10), Utc::now()).unwrap();
        let err = r.cancel(None, Utc::now()).unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidTransition { .. }));
    }

    #[test]
    fn test_no_show_before_arrival_rejected() {
        let mut r = confirmed();
        assert!(r.mark_no_show(day(9), Utc::now()).is_err());
        r.mark_no_show(day(10), Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::NoShow);
    }

    #[test]
    fn test_patch_after_check_in_rejected() {
        let mut r = confirmed();
        r.check_in(day(10), Utc::now()).unwrap();
        assert!(r.apply(ReservationPatch::default()).is_err());
    }
}
