//! Command handlers, one module per domain.
//!
//! ## Logging Ownership
//!
//! Each public function here is an operation boundary and emits exactly one
//! `start` event and one `end` or `end_error` event through `logged!`.
//! Store and core code below it never log at `info`.
//!
//! ## Clock
//!
//! Commands whose rules depend on the calendar take `today` explicitly so
//! callers (and tests) decide which day it is. Audit instants use `Utc::now`.

#![allow(clippy::result_large_err)]

pub mod accounts;
pub mod attendance;
pub mod billing;
pub mod budgets;
pub mod employees;
pub mod expenses;
pub mod guests;
pub mod housekeeping;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod posting;
pub mod reports;
pub mod reservations;
pub mod rooms;
pub mod tax;

use innkeep_core::errors::ExErrorKind;
use innkeep_store::errors::from_rusqlite;
use rusqlite::{Connection, Transaction};

use crate::Result;

/// Attempts before a colliding human reference is reported as a conflict
const REFERENCE_ATTEMPTS: usize = 5;

pub(crate) fn begin(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction().map_err(from_rusqlite)
}

pub(crate) fn commit(tx: Transaction<'_>) -> Result<()> {
    tx.commit().map_err(from_rusqlite)
}

/// Insert a record carrying a random short reference, drawing a new one
/// while the unique index rejects it.
pub(crate) fn insert_with_fresh_reference<T>(
    record: &mut T,
    mut assign: impl FnMut(&mut T),
    mut insert: impl FnMut(&T) -> Result<()>,
) -> Result<()> {
    let mut attempt = 1;
    loop {
        match insert(record) {
            Err(e) if e.kind() == ExErrorKind::AlreadyExists && attempt < REFERENCE_ATTEMPTS => {
                tracing::debug!(attempt, "reference collision, retrying");
                assign(record);
                attempt += 1;
            }
            other => return other,
        }
    }
}
