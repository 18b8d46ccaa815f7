//! Migration framework
//!
//! Provides:
//! - Migration runner that records a checksum per migration
//! - Idempotent application, refusing to run over edited migrations
//! - Embedded SQL migrations, including the default chart of accounts

mod checksums;
mod embedded;
mod runner;

pub use checksums::compute_checksum;
pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
