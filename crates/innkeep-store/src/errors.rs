//! Error handling for innkeep-store
//!
//! Wraps innkeep-core ExError with store-specific helpers

use innkeep_core::errors::{ExError, ExErrorKind, InnkeepError};
use rusqlite::ffi;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// Unique violations become `AlreadyExists` and foreign-key violations
/// `InUse`; everything else is a persistence failure.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref detail) = err {
        let message = detail.clone().unwrap_or_else(|| err.to_string());
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return ExError::new(ExErrorKind::AlreadyExists)
                    .with_op("sqlite")
                    .with_message(message);
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return ExError::new(ExErrorKind::InUse)
                    .with_op("sqlite")
                    .with_message(message);
            }
            _ => {}
        }
    }
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Missing row for a lookup by id
pub fn not_found(entity: &'static str, id: &str) -> ExError {
    InnkeepError::not_found(entity, id).into()
}
