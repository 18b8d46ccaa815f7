//! Repository layer
//!
//! `SqliteRepo` is a namespace of associated functions, one `impl` block per
//! domain. Every function takes a `&Connection`; a `&Transaction` derefs to
//! one, so the engine composes writes inside its own SQL transaction.

pub mod hydration;

mod accounts;
mod attendance;
mod billing;
mod budgets;
mod employees;
mod expenses;
mod guests;
mod housekeeping;
mod leave;
mod payroll;
mod performance;
mod reservations;
mod rooms;
mod rows;
mod tax;
mod transactions;

/// SQLite persistence for every Innkeep model
pub struct SqliteRepo;
