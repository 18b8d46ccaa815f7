//! Innkeep Core - domain kernel of the hotel property-management backend
//!
//! This crate holds everything that does not touch storage or the network:
//! - Models for rooms, reservations, guests, billing, housekeeping,
//!   accounting and HR, with their validation and status transitions
//! - The double-entry `Ledger` that validates and applies postings
//! - Pure arithmetic for tax, payroll, leave and budgets
//! - Report aggregation over posted journal lines
//! - The error and logging facilities shared by every crate

pub mod errors;
pub mod ledger;
pub mod logging_facility;
pub mod model;
pub mod money;
pub mod ops;
pub mod reports;
pub mod rules;
pub mod settings;

pub use innkeep_core_types as core_types;

pub use errors::{ExError, ExErrorKind, InnkeepError, Result};
pub use ledger::{BalanceChange, Ledger};
pub use settings::HotelSettings;
