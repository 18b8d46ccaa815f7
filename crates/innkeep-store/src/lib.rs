//! Innkeep Store - SQLite persistence
//!
//! Provides:
//! - Connection helpers (`db`)
//! - Embedded, checksummed migrations including the default chart of accounts
//! - `SqliteRepo`, the row-level persistence for every domain model
//! - Ledger hydration for the engine's posting path

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteRepo;
