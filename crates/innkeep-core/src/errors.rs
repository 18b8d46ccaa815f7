use innkeep_core_types::RequestId;
use thiserror::Error;

/// Result type alias using InnkeepError
pub type Result<T> = std::result::Result<T, InnkeepError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the store, engine or API is classified into one
/// of these kinds. Each kind has a stable `ERR_*` code used in API bodies,
/// log lines and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // State
    InvalidTransition,
    Conflict,
    InUse,

    // Hotel operations
    RoomUnavailable,
    CapacityExceeded,

    // Money
    Unbalanced,
    AccountMismatch,
    PaymentExceedsBalance,
    InsufficientLeaveBalance,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::InUse => "ERR_IN_USE",
            ExErrorKind::RoomUnavailable => "ERR_ROOM_UNAVAILABLE",
            ExErrorKind::CapacityExceeded => "ERR_CAPACITY_EXCEEDED",
            ExErrorKind::Unbalanced => "ERR_UNBALANCED",
            ExErrorKind::AccountMismatch => "ERR_ACCOUNT_MISMATCH",
            ExErrorKind::PaymentExceedsBalance => "ERR_PAYMENT_EXCEEDS_BALANCE",
            ExErrorKind::InsufficientLeaveBalance => "ERR_INSUFFICIENT_LEAVE_BALANCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus context for
/// debugging. Store and engine layers return this type.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for Innkeep operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InnkeepError {
    // ===== Lookup =====
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Entity with the same natural key already exists
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    // ===== Validation =====
    /// Field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Operation not allowed from the entity's current status
    #[error("Cannot {action} {entity} {id} while it is {status}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        status: String,
        action: &'static str,
    },

    /// Entity is referenced elsewhere and cannot be removed or changed
    #[error("{entity} {id} is in use: {reason}")]
    InUse {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// Two date ranges that must not intersect do
    #[error("{entity} {id} overlaps existing {entity} {other_id}")]
    Overlap {
        entity: &'static str,
        id: String,
        other_id: String,
    },

    // ===== Rooms & stays =====
    /// Room already booked or blocked for the requested stay
    #[error("Room {room_id} is not available from {check_in} to {check_out}")]
    RoomUnavailable {
        room_id: String,
        check_in: String,
        check_out: String,
    },

    /// Party does not fit the room
    #[error("Room {room_id} holds {capacity} guests, {requested} requested")]
    CapacityExceeded {
        room_id: String,
        capacity: u32,
        requested: u32,
    },

    // ===== Ledger =====
    /// Debits and credits do not match
    #[error("Transaction is unbalanced: debits {debit_cents} != credits {credit_cents}")]
    UnbalancedTransaction { debit_cents: i64, credit_cents: i64 },

    /// A journal line is malformed
    #[error("Invalid journal line {index}: {reason}")]
    InvalidJournalLine { index: usize, reason: String },

    /// Account is deactivated and cannot take postings
    #[error("Account {account_id} is inactive")]
    AccountInactive { account_id: String },

    /// Account exists but has the wrong type for the operation
    #[error("Account {account_id} is {actual}, expected {expected}")]
    AccountTypeMismatch {
        account_id: String,
        expected: String,
        actual: String,
    },

    // ===== Billing =====
    /// Payment is larger than what is owed
    #[error("Payment of {amount_cents} exceeds balance {balance_cents} on invoice {invoice_id}")]
    PaymentExceedsBalance {
        invoice_id: String,
        amount_cents: i64,
        balance_cents: i64,
    },

    // ===== HR =====
    /// Annual leave request larger than what remains
    #[error("Employee {employee_id} requested {requested} days, {remaining} remaining")]
    InsufficientLeaveBalance {
        employee_id: String,
        requested: i64,
        remaining: i64,
    },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl InnkeepError {
    /// Shorthand for a field validation failure
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        InnkeepError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        InnkeepError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Conversion from InnkeepError to ExError
///
/// Every domain error lands in exactly one kind; the display text becomes
/// the message.
impl From<InnkeepError> for ExError {
    fn from(err: InnkeepError) -> Self {
        let message = err.to_string();
        let (kind, entity_id) = match err {
            InnkeepError::NotFound { id, .. } => (ExErrorKind::NotFound, Some(id)),
            InnkeepError::AlreadyExists { key, .. } => (ExErrorKind::AlreadyExists, Some(key)),
            InnkeepError::InvalidInput { .. } => (ExErrorKind::InvalidInput, None),
            InnkeepError::InvalidTransition { id, .. } => {
                (ExErrorKind::InvalidTransition, Some(id))
            }
            InnkeepError::InUse { id, .. } => (ExErrorKind::InUse, Some(id)),
            InnkeepError::Overlap { id, .. } => (ExErrorKind::Conflict, Some(id)),
            InnkeepError::RoomUnavailable { room_id, .. } => {
                (ExErrorKind::RoomUnavailable, Some(room_id))
            }
            InnkeepError::CapacityExceeded { room_id, .. } => {
                (ExErrorKind::CapacityExceeded, Some(room_id))
            }
            InnkeepError::UnbalancedTransaction { .. } => (ExErrorKind::Unbalanced, None),
            InnkeepError::InvalidJournalLine { .. } => (ExErrorKind::InvalidInput, None),
            InnkeepError::AccountInactive { account_id } => {
                (ExErrorKind::AccountMismatch, Some(account_id))
            }
            InnkeepError::AccountTypeMismatch { account_id, .. } => {
                (ExErrorKind::AccountMismatch, Some(account_id))
            }
            InnkeepError::PaymentExceedsBalance { invoice_id, .. } => {
                (ExErrorKind::PaymentExceedsBalance, Some(invoice_id))
            }
            InnkeepError::InsufficientLeaveBalance { employee_id, .. } => {
                (ExErrorKind::InsufficientLeaveBalance, Some(employee_id))
            }
            InnkeepError::Serialization { .. } => (ExErrorKind::Serialization, None),
            InnkeepError::Internal { .. } => (ExErrorKind::Internal, None),
        };

        let ex = ExError::new(kind).with_message(message);
        match entity_id {
            Some(id) => ex.with_entity_id(id),
            None => ex,
        }
    }
}

impl From<serde_json::Error> for InnkeepError {
    fn from(err: serde_json::Error) -> Self {
        InnkeepError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::NotFound,
            ExErrorKind::AlreadyExists,
            ExErrorKind::InvalidTransition,
            ExErrorKind::Conflict,
            ExErrorKind::InUse,
            ExErrorKind::RoomUnavailable,
            ExErrorKind::CapacityExceeded,
            ExErrorKind::Unbalanced,
            ExErrorKind::AccountMismatch,
            ExErrorKind::PaymentExceedsBalance,
            ExErrorKind::InsufficientLeaveBalance,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
            ExErrorKind::Persistence,
            ExErrorKind::Config,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_unbalanced_maps_to_unbalanced_kind() {
        let ex: ExError = InnkeepError::UnbalancedTransaction {
            debit_cents: 100,
            credit_cents: 90,
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::Unbalanced);
        assert!(ex.message().contains("100"));
        assert!(ex.message().contains("90"));
    }

    #[test]
    fn test_not_found_carries_entity_id() {
        let ex: ExError = InnkeepError::not_found("room", "r-1").into();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
        assert_eq!(ex.entity_id(), Some("r-1"));
        assert_eq!(ex.code(), "ERR_NOT_FOUND");
    }

    #[test]
    fn test_display_includes_op_and_entity() {
        let ex = ExError::new(ExErrorKind::Persistence)
            .with_op("sqlite")
            .with_entity_id("x")
            .with_message("disk full");
        let text = ex.to_string();
        assert!(text.starts_with("[ERR_PERSISTENCE]"));
        assert!(text.contains("'sqlite'"));
        assert!(text.contains("disk full"));
        assert!(text.contains("entity_id: x"));
    }
}
