//! Domain models
//!
//! Status and category enums are stored as their snake_case text form in
//! SQLite and on the wire; `string_enum!` keeps both in one place.

use chrono::NaiveDate;
use uuid::Uuid;

macro_rules! string_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::InnkeepError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::errors::InnkeepError::invalid(
                        stringify!($name),
                        format!("unknown value '{}'", other),
                    )),
                }
            }
        }
    };
}

pub mod account;
pub mod attendance;
pub mod billing;
pub mod budget;
pub mod employee;
pub mod expense;
pub mod guest;
pub mod housekeeping;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod reservation;
pub mod room;
pub mod tax;
pub mod transaction;

pub use account::{Account, AccountFilter, AccountPatch, AccountType, NewAccount};
pub use attendance::{AttendanceFilter, AttendanceRecord, NewAttendanceRecord};
pub use billing::{
    Invoice, InvoiceFilter, InvoiceItem, InvoiceStatus, ItemCategory, NewInvoice, NewInvoiceItem,
    NewPayment, Payment, PaymentMethod,
};
pub use budget::{Budget, BudgetPatch, NewBudget};
pub use employee::{
    Department, Employee, EmployeeFilter, EmployeePatch, EmployeeStatus, NewEmployee, PayType,
};
pub use expense::{
    Expense, ExpenseCategorySummary, ExpenseFilter, ExpensePatch, ExpenseStatus, NewExpense,
};
pub use guest::{Guest, GuestFilter, GuestPatch, NewGuest};
pub use housekeeping::{
    HousekeepingTask, NewTask, TaskFilter, TaskPriority, TaskStatus, TaskType,
};
pub use leave::{LeaveFilter, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};
pub use payroll::{PayrollRun, PayrollStatus, Payslip};
pub use performance::{NewReview, PerformanceReview, ReviewPatch};
pub use reservation::{
    BookingSource, NewReservation, Reservation, ReservationFilter, ReservationPatch,
    ReservationStatus,
};
pub use room::{
    AvailabilityQuery, NewRoom, NewRoomType, Room, RoomFilter, RoomPatch, RoomStatus, RoomType,
    RoomTypePatch,
};
pub use tax::{NewTaxRate, TaxRate, TaxRatePatch};
pub use transaction::{
    JournalLine, NewJournalLine, NewTransaction, Transaction, TransactionFilter,
    TransactionSource, TransactionStatus,
};

/// Patch field where an absent key leaves the value alone and `null`
/// clears it: use with `#[serde(default, deserialize_with = "nullable")]`
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Generate a time-ordered entity id
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Short uppercase token taken from a random UUID
pub(crate) fn short_token(len: usize) -> String {
    let raw = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
    raw[..len.min(raw.len())].to_string()
}

/// Build a human reference such as `INV-20260101-3F2A`
pub fn dated_reference(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}-{}", prefix, date.format("%Y%m%d"), short_token(4))
}

/// Reservation confirmation code, `RES-` plus eight characters
pub fn confirmation_code() -> String {
    format!("RES-{}", short_token(8))
}

pub fn employee_number() -> String {
    format!("EMP-{}", short_token(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dated_reference_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let reference = dated_reference("INV", date);
        assert!(reference.starts_with("INV-20260309-"));
        assert_eq!(reference.len(), "INV-20260309-".len() + 4);
        assert_eq!(confirmation_code().len(), 12);
        assert!(employee_number().starts_with("EMP-"));
    }

    #[test]
    fn test_string_enum_round_trip_text() {
        for status in RoomStatus::ALL {
            let parsed: RoomStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!("booked".parse::<RoomStatus>().is_err());
    }
}
